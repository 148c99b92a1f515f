//! # Image Definition Model
//!
//! Typed form of an image definition YAML document. Every struct is
//! registered with `describe!` so the core passes can fill defaults and
//! find missing required fields without per-type code.
//!
//! Serialization names follow the YAML document (`display-name`,
//! `extra-ppas`, ...). Declared names (`DisplayName`, `ExtraPPAs`, ...) are
//! what the required-field pass matches against a schema descriptor.
//!
//! Keys missing from the document decode to zero values
//! (`#[serde(default)]`); the required-field pass reports them.

use imgdef_core::{describe, FieldDescriptor};
use serde::{Deserialize, Serialize};

/// Root of an image definition document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ImageDefinition {
    pub name: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub revision: u32,
    pub architecture: String,
    pub series: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kernel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gadget: Option<Box<Gadget>>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub model_assertion: String,
    pub rootfs: Option<Box<Rootfs>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customization: Option<Box<Customization>>,
    pub artifacts: Option<Box<Artifact>>,
    pub class: String,
}

describe!(ImageDefinition {
    name => FieldDescriptor::leaf("ImageName", "name"),
    display_name => FieldDescriptor::leaf("DisplayName", "display-name"),
    revision => FieldDescriptor::leaf("Revision", "revision").omit_empty(),
    architecture => FieldDescriptor::leaf("Architecture", "architecture"),
    series => FieldDescriptor::leaf("Series", "series"),
    kernel => FieldDescriptor::leaf("Kernel", "kernel").omit_empty(),
    gadget => FieldDescriptor::nested("Gadget", "gadget").omit_empty(),
    model_assertion => FieldDescriptor::leaf("ModelAssertion", "model-assertion").omit_empty(),
    rootfs => FieldDescriptor::nested("Rootfs", "rootfs"),
    customization => FieldDescriptor::nested("Customization", "customization").omit_empty(),
    artifacts => FieldDescriptor::nested("Artifacts", "artifacts"),
    class => FieldDescriptor::leaf("Class", "class"),
});

/// Where the gadget snap comes from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Gadget {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(rename = "type")]
    pub gadget_type: String,
    #[serde(rename = "ref", skip_serializing_if = "String::is_empty")]
    pub gadget_ref: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub branch: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub target: String,
}

describe!(Gadget {
    url => FieldDescriptor::leaf("GadgetURL", "url").omit_empty(),
    gadget_type => FieldDescriptor::leaf("GadgetType", "type"),
    gadget_ref => FieldDescriptor::leaf("GadgetRef", "ref").omit_empty(),
    branch => FieldDescriptor::leaf("GadgetBranch", "branch").omit_empty(),
    target => FieldDescriptor::leaf("GadgetTarget", "target").omit_empty(),
});

/// How the root filesystem is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Rootfs {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<String>,
    pub archive: String,
    pub flavor: String,
    pub mirror: String,
    pub pocket: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<Box<Seed>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tarball: Option<Box<Tarball>>,
}

describe!(Rootfs {
    components => FieldDescriptor::collection("Components", "components").omit_empty(),
    archive => FieldDescriptor::leaf("Archive", "archive").omit_empty().default_value("ubuntu"),
    flavor => FieldDescriptor::leaf("Flavor", "flavor").omit_empty().default_value("ubuntu"),
    mirror => FieldDescriptor::leaf("Mirror", "mirror")
        .omit_empty()
        .default_value("http://archive.ubuntu.com/ubuntu/"),
    pocket => FieldDescriptor::leaf("Pocket", "pocket").omit_empty().default_value("release"),
    seed => FieldDescriptor::nested("Seed", "seed").omit_empty(),
    tarball => FieldDescriptor::nested("Tarball", "tarball").omit_empty(),
});

/// Germinate seed used to select the rootfs package set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Seed {
    pub urls: Vec<String>,
    pub branch: String,
    pub names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vcs: Option<bool>,
}

describe!(Seed {
    urls => FieldDescriptor::collection("SeedURLs", "urls"),
    branch => FieldDescriptor::leaf("SeedBranch", "branch"),
    names => FieldDescriptor::collection("Names", "names"),
    vcs => FieldDescriptor::leaf("Vcs", "vcs").omit_empty().default_value("true"),
});

/// Prebuilt rootfs tarball.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Tarball {
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub gpg: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sha256sum: String,
}

describe!(Tarball {
    url => FieldDescriptor::leaf("TarballURL", "url"),
    gpg => FieldDescriptor::leaf("GPG", "gpg").omit_empty(),
    sha256sum => FieldDescriptor::leaf("SHA256sum", "sha256sum").omit_empty(),
});

/// Changes applied on top of the base rootfs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Customization {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pocket: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_ppas: Vec<Box<Ppa>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_packages: Vec<Box<Package>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_snaps: Vec<Box<Snap>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fstab: Vec<Box<Fstab>>,
}

describe!(Customization {
    components => FieldDescriptor::collection("Components", "components").omit_empty(),
    pocket => FieldDescriptor::leaf("Pocket", "pocket").omit_empty(),
    extra_ppas => FieldDescriptor::collection("ExtraPPAs", "extra-ppas").omit_empty(),
    extra_packages => FieldDescriptor::collection("ExtraPackages", "extra-packages").omit_empty(),
    extra_snaps => FieldDescriptor::collection("ExtraSnaps", "extra-snaps").omit_empty(),
    fstab => FieldDescriptor::collection("Fstab", "fstab").omit_empty(),
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Ppa {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub auth: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub fingerprint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_enabled: Option<bool>,
}

describe!(Ppa {
    name => FieldDescriptor::leaf("PPAName", "name"),
    auth => FieldDescriptor::leaf("Auth", "auth").omit_empty(),
    fingerprint => FieldDescriptor::leaf("Fingerprint", "fingerprint").omit_empty(),
    keep_enabled => FieldDescriptor::leaf("KeepEnabled", "keep-enabled")
        .omit_empty()
        .default_value("true"),
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Package {
    pub name: String,
}

describe!(Package {
    name => FieldDescriptor::leaf("PackageName", "name"),
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Snap {
    pub name: String,
    pub channel: String,
    pub store: String,
}

describe!(Snap {
    name => FieldDescriptor::leaf("SnapName", "name"),
    channel => FieldDescriptor::leaf("Channel", "channel").omit_empty().default_value("stable"),
    store => FieldDescriptor::leaf("Store", "store").omit_empty().default_value("canonical"),
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Fstab {
    pub label: String,
    pub mountpoint: String,
    pub filesystem_type: String,
    pub mount_options: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dump: bool,
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub fsck_order: u32,
}

describe!(Fstab {
    label => FieldDescriptor::leaf("Label", "label"),
    mountpoint => FieldDescriptor::leaf("Mountpoint", "mountpoint"),
    filesystem_type => FieldDescriptor::leaf("FSType", "filesystem-type"),
    mount_options => FieldDescriptor::leaf("MountOptions", "mount-options")
        .omit_empty()
        .default_value("defaults"),
    dump => FieldDescriptor::leaf("Dump", "dump").omit_empty(),
    fsck_order => FieldDescriptor::leaf("FsckOrder", "fsck-order").omit_empty(),
});

/// Artifacts produced by the build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Artifact {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub img: Vec<Box<Img>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub qcow2: Vec<Box<Qcow2>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<Box<Manifest>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filelist: Option<Box<Filelist>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rootfs_tar: Option<Box<RootfsTar>>,
}

describe!(Artifact {
    img => FieldDescriptor::collection("Img", "img").omit_empty(),
    qcow2 => FieldDescriptor::collection("Qcow2", "qcow2").omit_empty(),
    manifest => FieldDescriptor::nested("Manifest", "manifest").omit_empty(),
    filelist => FieldDescriptor::nested("Filelist", "filelist").omit_empty(),
    rootfs_tar => FieldDescriptor::nested("RootfsTar", "rootfs-tar").omit_empty(),
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Img {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub volume: String,
}

describe!(Img {
    name => FieldDescriptor::leaf("ImgName", "name"),
    volume => FieldDescriptor::leaf("ImgVolume", "volume").omit_empty(),
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Qcow2 {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub volume: String,
}

describe!(Qcow2 {
    name => FieldDescriptor::leaf("Qcow2Name", "name"),
    volume => FieldDescriptor::leaf("Qcow2Volume", "volume").omit_empty(),
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub name: String,
}

describe!(Manifest {
    name => FieldDescriptor::leaf("ManifestName", "name"),
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filelist {
    pub name: String,
}

describe!(Filelist {
    name => FieldDescriptor::leaf("FilelistName", "name"),
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootfsTar {
    pub name: String,
    pub compression: String,
}

describe!(RootfsTar {
    name => FieldDescriptor::leaf("RootfsTarName", "name"),
    compression => FieldDescriptor::leaf("Compression", "compression")
        .omit_empty()
        .default_value("uncompressed"),
});

fn is_zero_u32(value: &u32) -> bool {
    *value == 0
}
