use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

/// An isolated environment: its own application directory, config, temp dir and cwd.
struct Fixture {
    root: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let root = TempDir::new().expect("temp dir");
        for dir in ["data/applications", "system", "tmp", "work"] {
            fs::create_dir_all(root.path().join(dir)).expect("create dir");
        }
        let fixture = Fixture { root };
        fixture.write_config("");
        fixture
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    fn work(&self) -> PathBuf {
        self.path("work")
    }

    fn write_config(&self, extra: &str) {
        let config = format!("[stdin]\ngrace_secs = 0\ndetach = false\n{extra}");
        fs::write(self.path("config.toml"), config).expect("write config");
    }

    fn add_application(&self, file_name: &str, body: &str) -> PathBuf {
        let path = self.path("data/applications").join(file_name);
        fs::write(&path, format!("[Desktop Entry]\n{body}")).expect("write desktop entry");
        path
    }

    #[cfg(unix)]
    fn add_recorder(&self) -> (PathBuf, PathBuf) {
        use std::os::unix::fs::PermissionsExt;

        let script = self.path("record.sh");
        let log = self.path("record.log");
        fs::write(
            &script,
            format!("#!/bin/sh\nprintf '%s\\n' \"$@\" >> '{}'\n", log.display()),
        )
        .expect("write script");
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).expect("chmod");
        (script, log)
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_launch"));
        cmd.current_dir(self.work())
            .env("LAUNCH_CONFIG", self.path("config.toml"))
            .env("XDG_DATA_HOME", self.path("data"))
            .env("XDG_DATA_DIRS", self.path("system"))
            .env("TMPDIR", self.path("tmp"))
            .env_remove("LAUNCH_LOG");
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command().args(args).output().expect("run launch")
    }

    fn run_with_stdin(&self, args: &[&str], input: &str) -> Output {
        let mut child = self
            .command()
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("spawn launch");
        child
            .stdin
            .take()
            .expect("stdin")
            .write_all(input.as_bytes())
            .expect("write stdin");
        child.wait_with_output().expect("wait launch")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn assert_fails_with(output: &Output, message: &str) {
    assert_eq!(output.status.code(), Some(1), "stderr: {}", stderr(output));
    assert_eq!(stderr(output), format!("launch: {message}\n"));
    assert!(stdout(output).is_empty(), "stdout: {}", stdout(output));
}

#[test]
fn e2e_find_application_by_bundle_id() {
    let fixture = Fixture::new();
    let entry = fixture.add_application(
        "org.example.Editor.desktop",
        "Type=Application\nName=Editor\nExec=editor %F\nX-Creator-Code=EdiT\n",
    );

    let output = fixture.run(&["-n", "-i", "org.example.Editor"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), format!("{}\n", entry.display()));

    let output = fixture.run(&["-n", "-c", "EdiT", "-a", "Editor"]);
    assert_eq!(stdout(&output), format!("{}\n", entry.display()));
}

#[test]
fn e2e_find_application_by_file_name_retries_suffix() {
    let fixture = Fixture::new();
    let entry = fixture.add_application("viewer.desktop", "Type=Application\nName=Image Viewer\nExec=viewer %f\n");

    let output = fixture.run(&["-n", "-a", "viewer"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), format!("{}\n", entry.display()));
}

#[test]
fn e2e_missing_application() {
    let fixture = Fixture::new();
    let output = fixture.run(&["-n", "-c", "ToyS"]);
    assert_fails_with(
        &output,
        "can't locate application: application not found (-10814)",
    );
}

#[test]
fn e2e_usage_errors() {
    let fixture = Fixture::new();
    fs::write(fixture.work().join("notes.txt"), "hi").expect("write");

    assert_fails_with(
        &fixture.run(&["-n", "-f", "notes.txt"]),
        "choose only one of -n, -p, -f, -l options",
    );
    assert_fails_with(
        &fixture.run(&["-n", "-n", "notes.txt"]),
        "choose only one of -n, -p, -f, -l options",
    );
    assert_fails_with(
        &fixture.run(&["-c", "Toy"]),
        "creator (argument of -c) must be four characters long",
    );
    assert_fails_with(
        &fixture.run(&["-u", "file:///", "-c", "ToyS"]),
        "application URL (argument of -u) incompatible with matching by -c, -i, -a",
    );
    assert_fails_with(
        &fixture.run(&["-n", "-w", "notes.txt"]),
        "options -w, -b, -m, -h, -L, -U apply to application launch (not -n or -f)",
    );
    assert_fails_with(
        &fixture.run(&["-w"]),
        "without items, must specify an application by -u, or one or more of -c, -i, -a",
    );
    assert_fails_with(&fixture.run(&["-s", "notes.txt"]), "-s option no longer functional, sorry");
}

#[test]
fn e2e_bare_invocation_prints_usage() {
    let fixture = Fixture::new();
    let output = fixture.run(&[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("Usage"), "stderr: {}", stderr(&output));
}

#[test]
fn e2e_help_and_bad_flags() {
    let fixture = Fixture::new();

    let output = fixture.run(&["--help"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("bundleID"));

    let output = fixture.run(&["-z", "notes.txt"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!stderr(&output).is_empty());
}

#[test]
fn e2e_find_items_prefers_existing_file_over_url() {
    let fixture = Fixture::new();
    fs::create_dir_all(fixture.work().join("a:")).expect("create dir");
    fs::write(fixture.work().join("a:").join("b"), "").expect("write");
    fs::write(fixture.work().join("notes.txt"), "hi").expect("write");

    let output = fixture.run(&["-n", "a://b", "./notes.txt", "https://example.com/"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "a://b\nnotes.txt\nhttps://example.com/\n");
}

#[test]
fn e2e_missing_item() {
    let fixture = Fixture::new();
    assert_fails_with(
        &fixture.run(&["-n", "missing.txt"]),
        "unable to locate 'missing.txt': file not found (-43)",
    );
}

#[test]
fn e2e_stdin_temp_file_is_removed() {
    let fixture = Fixture::new();
    let output = fixture.run_with_stdin(&["-n", "-"], "piped text\n");
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let printed = stdout(&output);
    let temp_path = Path::new(printed.trim_end());
    assert_eq!(temp_path.parent(), Some(fixture.path("tmp").as_path()));
    assert!(temp_path
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("launch-stationery-"));
    assert!(!temp_path.exists());
}

#[test]
fn e2e_info_report() {
    let fixture = Fixture::new();
    fs::write(fixture.work().join("notes.txt"), "hello").expect("write");
    fs::create_dir(fixture.work().join("docs")).expect("mkdir");

    let output = fixture.run(&["-f", "notes.txt", "docs", "https://example.com/"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report = stdout(&output);
    assert!(report.starts_with("notes.txt: document\n"), "Got:\n{}", report);
    assert!(report.contains("\tsize: "), "Got:\n{}", report);
    assert!(report.contains("\tmodified: "), "Got:\n{}", report);
    assert!(report.contains("docs: folder\n"), "Got:\n{}", report);
    assert!(report.contains("\tcontents: zero items\n"), "Got:\n{}", report);
    assert!(report.ends_with("https://example.com/: URL\n"), "Got:\n{}", report);
}

#[test]
fn e2e_info_on_application() {
    let fixture = Fixture::new();
    let entry = fixture.add_application(
        "org.example.Editor.desktop",
        "Type=Application\nName=Editor\nExec=editor %F\n",
    );

    let output = fixture.run(&["-f", entry.to_string_lossy().as_ref()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let report = stdout(&output);
    assert!(report.contains(": application\n"), "Got:\n{}", report);
    assert!(report.contains("\tbundle ID: org.example.Editor\n"), "Got:\n{}", report);
    assert!(report.contains("\tname: Editor\n"), "Got:\n{}", report);
}

#[cfg(unix)]
#[test]
fn e2e_open_items_uses_configured_opener() {
    let fixture = Fixture::new();
    let (script, log) = fixture.add_recorder();
    fixture.write_config(&format!("opener = '{}'\n", script.display()));
    fs::write(fixture.work().join("notes.txt"), "hi").expect("write");

    let output = fixture.run(&["notes.txt", "https://example.com/"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        fs::read_to_string(&log).expect("read log"),
        "notes.txt\nhttps://example.com/\n"
    );
}

#[cfg(unix)]
#[test]
fn e2e_open_with_desktop_application_and_wait() {
    let fixture = Fixture::new();
    let (script, log) = fixture.add_recorder();
    fixture.add_application(
        "org.example.Recorder.desktop",
        &format!("Type=Application\nName=Recorder\nExec=\"{}\" %F\n", script.display()),
    );
    fs::write(fixture.work().join("notes.txt"), "hi").expect("write");

    let output = fixture.run(&["-w", "-i", "org.example.Recorder", "-o", "--flag", "notes.txt"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(fs::read_to_string(&log).expect("read log"), "--flag\nnotes.txt\n");
}

#[cfg(unix)]
#[test]
fn e2e_failing_opener_reports_status() {
    let fixture = Fixture::new();
    fixture.write_config("opener = 'false'\n");
    fs::write(fixture.work().join("notes.txt"), "hi").expect("write");

    assert_fails_with(
        &fixture.run(&["notes.txt"]),
        "can't open items: unknown Launch Services error (-10810)",
    );
}
