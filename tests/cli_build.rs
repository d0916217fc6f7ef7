//! End-to-end tests for `plugpack build`

mod common;

use common::*;

#[test]
fn missing_host_jar_fails_with_configuration_exit_code() {
    let env = TestEnv::plugin_project();
    std::fs::remove_file(env.project_path("HystaleJar/HytaleServer.jar")).unwrap();

    let result = env.run(&["build"]);

    assert!(!result.is_success());
    assert_eq!(result.exit_code, 2, "{}", result.combined_output());
    assert!(
        result.stderr.contains("Missing Hytale server jar"),
        "stderr: {}",
        result.stderr
    );
    assert!(result.stderr.contains("--host-jar"));
    assert!(!env.project_path("build/libs").exists());
}

#[test]
fn build_is_the_default_command() {
    let env = TestEnv::plugin_project();

    let result = env.run(&[]);

    assert!(result.is_success(), "{}", result.combined_output());
    assert!(env.output_jar().exists());
    assert!(result.stdout.contains("Built"), "{}", result.stdout);
}

#[test]
fn archive_contains_classes_assets_and_drivers_without_signatures() {
    let env = TestEnv::plugin_project();

    let result = env.run(&["build"]);
    assert!(result.is_success(), "{}", result.combined_output());

    let names = entry_names(&env.output_jar());
    for expected in [
        "META-INF/MANIFEST.MF",
        "dev/hyperks/Plugin.class",
        "manifest.json",
        "Server/Item/Items/perk.json",
        "org/sqlite/JDBC.class",
        "com/mysql/cj/jdbc/Driver.class",
    ] {
        assert!(names.iter().any(|n| n == expected), "missing {}: {:?}", expected, names);
    }
    for name in &names {
        assert!(
            !(name.ends_with(".SF") || name.ends_with(".DSA") || name.ends_with(".RSA")),
            "signature entry survived: {}",
            name
        );
    }
}

#[test]
fn later_driver_wins_service_file() {
    let env = TestEnv::plugin_project();

    let result = env.run(&["--json", "build"]);
    assert!(result.is_success(), "{}", result.combined_output());

    let names = entry_names(&env.output_jar());
    let count = names
        .iter()
        .filter(|n| *n == "META-INF/services/java.sql.Driver")
        .count();
    assert_eq!(count, 1);
    assert_eq!(
        entry_content(&env.output_jar(), "META-INF/services/java.sql.Driver"),
        b"com.mysql.cj.jdbc.Driver"
    );

    let json = result.json();
    assert_eq!(json["command"], "build");
    assert_eq!(json["conflicts"].as_array().unwrap().len(), 1);
    assert_eq!(json["conflicts"][0]["path"], "META-INF/services/java.sql.Driver");
    assert_eq!(json["excluded_modules"][0], "com.hypixel.hytale:Server");
}

#[test]
fn first_wins_flag_keeps_earlier_driver() {
    let env = TestEnv::plugin_project();

    let result = env.run(&["build", "--duplicates", "first-wins"]);
    assert!(result.is_success(), "{}", result.combined_output());

    assert_eq!(
        entry_content(&env.output_jar(), "META-INF/services/java.sql.Driver"),
        b"org.sqlite.JDBC"
    );
}

#[test]
fn fail_strategy_exits_with_assembly_code() {
    let env = TestEnv::plugin_project();

    let result = env.run(&["build", "--duplicates", "fail"]);

    assert_eq!(result.exit_code, 4, "{}", result.combined_output());
    assert!(result.stderr.contains("duplicate archive entry"));
    assert!(!env.output_jar().exists());
}

#[test]
fn repeated_builds_are_byte_identical() {
    let env = TestEnv::plugin_project();

    assert!(env.run(&["build"]).is_success());
    let first = std::fs::read(env.output_jar()).unwrap();
    assert!(env.run(&["build"]).is_success());
    let second = std::fs::read(env.output_jar()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn host_jar_flag_overrides_default_location() {
    let env = TestEnv::plugin_project();
    std::fs::remove_file(env.project_path("HystaleJar/HytaleServer.jar")).unwrap();
    env.write_project_file("vendor/Server-2025.jar", b"alt api");

    let result = env.run(&["--json", "build", "--host-jar", "vendor/Server-2025.jar"]);

    assert!(result.is_success(), "{}", result.combined_output());
    let host = result.json()["host_jar"].as_str().unwrap().to_string();
    assert!(host.ends_with("Server-2025.jar"), "{}", host);
}

#[test]
fn host_jar_env_var_overrides_default_location() {
    let env = TestEnv::plugin_project();
    std::fs::remove_file(env.project_path("HystaleJar/HytaleServer.jar")).unwrap();
    env.write_project_file("vendor/Server.jar", b"alt api");

    let result = env.run_with_env(&["build"], &[("PLUGPACK_HOST_JAR", "vendor/Server.jar")]);

    assert!(result.is_success(), "{}", result.combined_output());
}

#[test]
fn missing_dependency_exits_with_resolution_code() {
    let env = TestEnv::plugin_project();
    env.write_config(
        r#"
embed = ["com.example:absent:1.0"]

[package]
name = "hyperks"

[resolve]
maven_central = false
"#,
    );

    let result = env.run(&["build"]);

    assert_eq!(result.exit_code, 3, "{}", result.combined_output());
    assert!(result.stderr.contains("com.example:absent:1.0"), "{}", result.stderr);
    assert!(!env.output_jar().exists());
}

#[test]
fn json_errors_are_machine_readable() {
    let env = TestEnv::plugin_project();
    std::fs::remove_file(env.project_path("HystaleJar/HytaleServer.jar")).unwrap();

    let result = env.run(&["--json", "build"]);

    assert_eq!(result.exit_code, 2);
    let json = result.json();
    assert_eq!(json["event"], "error");
    assert_eq!(json["category"], "configuration");
    assert!(json["message"]
        .as_str()
        .unwrap()
        .contains("Missing Hytale server jar"));
}

#[test]
fn unknown_config_key_warns_with_suggestion() {
    let env = TestEnv::plugin_project();
    env.write_config(
        r#"
[package]
name = "hyperks"
asets = "assets"

[resolve]
maven_central = false
"#,
    );

    let result = env.run(&["build"]);

    assert!(result.is_success(), "{}", result.combined_output());
    assert!(result.stderr.contains("unknown key"), "{}", result.stderr);
    assert!(result.stderr.contains("did you mean 'assets'?"), "{}", result.stderr);
}

#[test]
fn project_dir_flag_builds_elsewhere() {
    let env = TestEnv::plugin_project();
    let elsewhere = tempfile::tempdir().unwrap();
    let project = env.project_root.path().to_str().unwrap().to_string();

    let result = env.run_from(elsewhere.path(), &["-C", &project, "build"], &[]);

    assert!(result.is_success(), "{}", result.combined_output());
    assert!(env.output_jar().exists());
}
