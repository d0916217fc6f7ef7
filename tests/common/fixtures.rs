//! Jar and POM fixtures

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;

fn split(notation: &str) -> (String, String, String) {
    let parts: Vec<&str> = notation.split(':').collect();
    assert_eq!(parts.len(), 3, "fixture coordinates are group:artifact:version");
    (parts[0].to_string(), parts[1].to_string(), parts[2].to_string())
}

fn module_dir(notation: &str) -> PathBuf {
    let (group, artifact, version) = split(notation);
    PathBuf::from(group.replace('.', "/"))
        .join(&artifact)
        .join(&version)
}

/// Repository-relative jar path of `group:artifact:version`
pub fn jar_path(notation: &str) -> PathBuf {
    let (_, artifact, version) = split(notation);
    module_dir(notation).join(format!("{}-{}.jar", artifact, version))
}

pub fn write_jar(path: &Path, files: &[(&str, &[u8])]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
    for (name, content) in files {
        writer
            .start_file(name.to_string(), SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap();
}

/// POM with runtime dependencies on `dependencies`
pub fn write_pom(repo: &Path, notation: &str, dependencies: &[&str]) {
    let (group, artifact, version) = split(notation);
    let deps: String = dependencies
        .iter()
        .map(|dep| {
            let (g, a, v) = split(dep);
            format!(
                "    <dependency><groupId>{}</groupId><artifactId>{}</artifactId><version>{}</version></dependency>\n",
                g, a, v
            )
        })
        .collect();
    let pom = format!(
        "<project>\n  <modelVersion>4.0.0</modelVersion>\n  <groupId>{}</groupId>\n  <artifactId>{}</artifactId>\n  <version>{}</version>\n  <dependencies>\n{}  </dependencies>\n</project>\n",
        group, artifact, version, deps
    );
    let path = repo
        .join(module_dir(notation))
        .join(format!("{}-{}.pom", artifact, version));
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, pom).unwrap();
}

/// File entry names, directories skipped
pub fn entry_names(jar: &Path) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(File::open(jar).unwrap()).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .filter(|name| !name.ends_with('/'))
        .collect()
}

pub fn entry_content(jar: &Path, name: &str) -> Vec<u8> {
    let mut archive = zip::ZipArchive::new(File::open(jar).unwrap()).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut content = Vec::new();
    entry.read_to_end(&mut content).unwrap();
    content
}
