//! Shared helpers for workspace specs.
//!
//! Every spec drives the compiled `assay` binary as a subprocess inside
//! a temporary project directory, with stub compiler and analyzer
//! scripts standing in for the real toolchain. Nothing here links
//! against the workspace crates; artifact names and exit codes are
//! asserted as the black-box contract.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;

/// A temporary directory the specs build their project world in.
pub struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    pub fn empty() -> Project {
        Project {
            dir: tempfile::TempDir::new().expect("create project dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file under the project root, creating parents.
    pub fn file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directory");
        }
        fs::write(&path, content).expect("write project file");
        path
    }

    /// Write an executable `/bin/sh` script under the project root.
    pub fn script(&self, rel: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = self.file(rel, &format!("#!/bin/sh\n{body}"));
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod script");
        path
    }

    /// An `assay` invocation rooted at this project.
    pub fn assay(&self) -> Cmd {
        Cmd::new(self.dir.path())
    }
}

/// An `assay` invocation with no project context.
pub fn cli() -> Cmd {
    Cmd::new(&std::env::temp_dir())
}

pub struct Cmd {
    inner: assert_cmd::Command,
}

impl Cmd {
    fn new(dir: &Path) -> Cmd {
        let mut inner = assert_cmd::Command::cargo_bin("assay").expect("assay binary");
        inner.current_dir(dir);
        inner.env("NO_COLOR", "1");
        Cmd { inner }
    }

    pub fn args(mut self, args: &[&str]) -> Cmd {
        self.inner.args(args);
        self
    }

    /// Run and require exit code 0.
    pub fn passes(mut self) -> RunResult {
        let result = self.run();
        assert!(
            result.output.status.success(),
            "expected success, got {:?}\nstdout: {}\nstderr: {}",
            result.output.status.code(),
            result.stdout(),
            result.stderr()
        );
        result
    }

    /// Run and require this exact exit code.
    pub fn fails_with(mut self, code: i32) -> RunResult {
        let result = self.run();
        assert_eq!(
            result.output.status.code(),
            Some(code),
            "expected exit {}\nstdout: {}\nstderr: {}",
            code,
            result.stdout(),
            result.stderr()
        );
        result
    }

    fn run(&mut self) -> RunResult {
        let output = self.inner.output().expect("run assay");
        RunResult { output }
    }
}

pub struct RunResult {
    output: Output,
}

impl RunResult {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    /// Parse stdout as one JSON document.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout()).expect("stdout should be JSON")
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(
            self.stdout().contains(needle),
            "stdout missing {needle:?}:\n{}",
            self.stdout()
        );
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(
            self.stderr().contains(needle),
            "stderr missing {needle:?}:\n{}",
            self.stderr()
        );
        self
    }
}

/// Stub toolchain: a `gcc` that answers the configuration probes, a
/// `clang` that serves the checker catalog, dumps ASTs in CTU collect
/// mode and writes SARIF otherwise, a `clang-tidy` that prints SARIF
/// on stdout, and the extdef mapping tool next to the clang.
pub struct Toolchain {
    pub gcc: PathBuf,
    pub clang: PathBuf,
    pub tidy: PathBuf,
}

const CLANG_STUB: &str = r#"if [ "$1" = "-cc1" ]; then
  echo 'CHECKERS:'
  echo '  core.DivideZero  Check for division by zero'
  exit 0
fi
mode=analyze
out=""
prev=""
for a in "$@"; do
  [ "$a" = "-emit-ast" ] && mode=ast
  [ "$prev" = "-o" ] && out="$a"
  prev="$a"
done
if [ "$mode" = "ast" ]; then
  : > "$out"
else
  printf '%s' '{"version":"2.1.0","runs":[]}' > "$out"
fi
"#;

impl Toolchain {
    pub fn install(project: &Project) -> Toolchain {
        let gcc = project.script(
            "bin/gcc",
            r#"case " $* " in
  *" -dM "*) echo '#define __STDC_VERSION__ 201710L' ;;
esac
case " $* " in
  *" -v "*) {
    echo 'Target: x86_64-pc-linux-gnu'
    echo '#include <...> search starts here:'
    echo 'End of search list.'
  } >&2 ;;
esac
exit 0
"#,
        );
        let clang = project.script("bin/clang", CLANG_STUB);
        let tidy = project.script(
            "bin/clang-tidy",
            r#"case " $* " in
  *" -list-checks "*)
    echo 'Enabled checks:'
    echo '    bugprone-use-after-move'
    exit 0 ;;
esac
printf '%s' '{"version":"2.1.0","runs":[]}'
"#,
        );
        project.script(
            "bin/clang-extdef-mapping",
            "echo \"c:@F@$(basename \"$1\")# $1\"\n",
        );
        Toolchain { gcc, clang, tidy }
    }

    pub fn clang_str(&self) -> String {
        self.clang.display().to_string()
    }

    pub fn tidy_str(&self) -> String {
        self.tidy.display().to_string()
    }
}

/// A compilation database record over a freshly written source file.
pub fn compile_record(project: &Project, compiler: &Path, name: &str) -> serde_json::Value {
    let symbol = name.replace(['.', '/'], "_");
    project.file(name, &format!("int {symbol}(void) {{ return 0; }}\n"));
    serde_json::json!({
        "directory": project.path(),
        "command": format!("{} -c {name}", compiler.display()),
        "file": name,
    })
}

pub fn write_compdb(project: &Project, records: &[serde_json::Value]) -> PathBuf {
    project.file(
        "compile_commands.json",
        &serde_json::to_string_pretty(records).expect("serialize compile commands"),
    )
}

/// `*.sarif` file names directly under `dir`, sorted.
pub fn sarif_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".sarif"))
        .collect();
    names.sort();
    names
}

/// Subdirectory paths directly under `dir`, sorted. A missing
/// directory means none.
pub fn subdirs(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    dirs
}
