//! Test environment builder for isolated plugpack testing.
//!
//! The home directory is redirected with `PLUGPACK_TEST_HOME`, so the Maven
//! local repository (`~/.m2/repository`) and the download cache live in a
//! temp dir. Maven Central is disabled by the fixture config; no test
//! touches the network.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

use super::fixtures::{jar_path, write_jar, write_pom};

/// Result of running a plugpack CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(self.stdout.trim())
            .unwrap_or_else(|e| panic!("stdout is not JSON ({}):\n{}", e, self.stdout))
    }
}

/// Isolated test environment with temp directories.
pub struct TestEnv {
    /// Temporary directory for the project
    pub project_root: TempDir,
    /// Temporary directory standing in for HOME
    pub home_dir: TempDir,
    bin: PathBuf,
}

impl TestEnv {
    /// Empty project, nothing published
    pub fn new() -> Self {
        Self {
            project_root: tempfile::Builder::new()
                .prefix("hyperks-")
                .tempdir()
                .expect("Failed to create project dir"),
            home_dir: tempfile::tempdir().expect("Failed to create home dir"),
            bin: PathBuf::from(env!("CARGO_BIN_EXE_plugpack")),
        }
    }

    /// A plugin project with the host jar, classes, assets and both default
    /// drivers published to the fake Maven local repository
    pub fn plugin_project() -> Self {
        let env = Self::new();
        env.write_config(DEFAULT_CONFIG);
        env.write_host_jar();
        env.write_project_file("build/classes/java/main/dev/hyperks/Plugin.class", b"plugin");
        env.write_project_file("assets/manifest.json", b"{\"Name\":\"Hyperks\"}");
        env.write_project_file("assets/Server/Item/Items/perk.json", b"{}");

        env.publish(
            "org.xerial:sqlite-jdbc:3.49.1.0",
            &[],
            &[
                ("org/sqlite/JDBC.class", b"sqlite"),
                ("META-INF/services/java.sql.Driver", b"org.sqlite.JDBC"),
                ("META-INF/SQLITE.SF", b"sig"),
                ("META-INF/SQLITE.RSA", b"sig"),
            ],
        );
        env.publish(
            "com.mysql:mysql-connector-j:9.3.0",
            &["com.hypixel.hytale:Server:1.0"],
            &[
                ("com/mysql/cj/jdbc/Driver.class", b"mysql"),
                ("META-INF/services/java.sql.Driver", b"com.mysql.cj.jdbc.Driver"),
                ("META-INF/MYSQL.DSA", b"sig"),
            ],
        );
        env
    }

    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    pub fn output_jar(&self) -> PathBuf {
        self.project_path("build/libs/hyperks.jar")
    }

    pub fn write_project_file(&self, relative: &str, content: &[u8]) {
        let path = self.project_path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    pub fn write_config(&self, content: &str) {
        self.write_project_file("plugpack.toml", content.as_bytes());
    }

    pub fn write_host_jar(&self) {
        self.write_project_file("HystaleJar/HytaleServer.jar", b"host api");
    }

    /// Publish a jar and its POM into `~/.m2/repository`
    pub fn publish(&self, notation: &str, dependencies: &[&str], files: &[(&str, &[u8])]) {
        let repo = self.home_dir.path().join(".m2/repository");
        write_pom(&repo, notation, dependencies);
        write_jar(&repo.join(jar_path(notation)), files);
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        self.run_from(self.project_root.path(), args, env_vars)
    }

    pub fn run_from(&self, cwd: &Path, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = Command::new(&self.bin);
        cmd.current_dir(cwd)
            .args(args)
            .env("PLUGPACK_TEST_HOME", self.home_dir.path())
            .env("NO_COLOR", "1")
            .env_remove("PLUGPACK_HOST_JAR")
            .env_remove("PLUGPACK_OFFLINE")
            .env_remove("PLUGPACK_DUPLICATES")
            .env_remove("PLUGPACK_CONFLICT")
            .env_remove("PLUGPACK_CACHE_DIR")
            .env_remove("PLUGPACK_LOG")
            .env_remove("SOURCE_DATE_EPOCH");
        for (key, value) in env_vars {
            cmd.env(key, value);
        }
        let output = cmd.output().expect("Failed to execute plugpack");
        to_result(output)
    }
}

fn to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

/// Named archive, no network: only the fake Maven local repository is searched
pub const DEFAULT_CONFIG: &str = r#"
[package]
name = "hyperks"

[resolve]
maven_central = false
"#;
