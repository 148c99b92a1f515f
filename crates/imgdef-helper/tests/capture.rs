//! Stream capture redirects process-wide descriptors, so all phases run
//! inside one test to keep them from overlapping.

use std::io::Write;

use imgdef_helper::{run_command, StdStream, StreamCapture};

#[test]
fn captures_direct_and_child_output() {
    // Writes through the stream handle and from an inheriting child.
    let capture = StreamCapture::begin(StdStream::Stdout).unwrap();
    assert!(capture.is_active());
    writeln!(std::io::stdout(), "from the test").unwrap();
    std::process::Command::new("echo")
        .arg("from a child")
        .status()
        .unwrap();
    let text = capture.finish().unwrap();
    assert_eq!(text, "from the test\nfrom a child\n");

    // Restore is idempotent and later writes are not captured.
    let mut capture = StreamCapture::begin(StdStream::Stderr).unwrap();
    writeln!(std::io::stderr(), "captured").unwrap();
    capture.restore().unwrap();
    capture.restore().unwrap();
    assert!(!capture.is_active());
    writeln!(std::io::stderr(), "not captured").unwrap();
    assert_eq!(capture.finish().unwrap(), "captured\n");

    // Live command output lands on stdout as well as in the result.
    let capture = StreamCapture::begin(StdStream::Stdout).unwrap();
    let output = run_command("sh", ["-c", "echo live"], true).unwrap();
    let mirrored = capture.finish().unwrap();
    assert_eq!(output, "live\n");
    assert_eq!(mirrored, "live\n");

    // Dropping an active capture puts the stream back.
    {
        let _capture = StreamCapture::begin(StdStream::Stdout).unwrap();
    }
    let capture = StreamCapture::begin(StdStream::Stdout).unwrap();
    writeln!(std::io::stdout(), "after drop").unwrap();
    assert_eq!(capture.finish().unwrap(), "after drop\n");
}
