//! Dependency extraction feeding the compile pool, end to end.

#![cfg(unix)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use quiver_compile::{CompileError, Driver};
use quiver_conformance::{names, TestProject};

fn write_jar(path: &Path, entries: &[(&str, &str)]) {
    let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
    let options = zip::write::SimpleFileOptions::default();
    for (name, content) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

fn write_tar<W: Write>(writer: W, entries: &[(&str, &str)]) -> W {
    let mut tar = tar::Builder::new(writer);
    for (name, content) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Regular);
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        tar.append_data(&mut header, name, content.as_bytes()).unwrap();
    }
    tar.into_inner().unwrap()
}

fn write_tar_gz(path: &Path, entries: &[(&str, &str)]) {
    let file = File::create(path).unwrap();
    let gz = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    write_tar(gz, entries).finish().unwrap();
}

fn write_tar_bz2(path: &Path, entries: &[(&str, &str)]) {
    let file = File::create(path).unwrap();
    let bz = bzip2::write::BzEncoder::new(file, bzip2::Compression::default());
    write_tar(bz, entries).finish().unwrap();
}

fn project_with_deps() -> TestProject {
    let project = TestProject::with_source_set(
        r#"sources = ["idl"]
schemas = ["**/*.idl"]
files = ["*.idl"]
dependencies = [
    "libs/common.jar",
    "libs/types.tar.gz",
    "libs/legacy.tar.bz2",
    "libs/raw.tgz",
    "libs/dir",
    "libs/Bare.idl",
    "libs/notes.txt",
]
"#,
    );
    let libs = project.root().join("libs");
    std::fs::create_dir_all(libs.join("dir/nested")).unwrap();

    write_jar(
        &libs.join("common.jar"),
        &[("Common.idl", "struct Common {}"), ("META-INF/MANIFEST.MF", "x")],
    );
    write_tar_gz(&libs.join("types.tar.gz"), &[("Types.idl", "struct Types {}")]);
    write_tar_bz2(&libs.join("legacy.tar.bz2"), &[("Legacy.idl", "struct Legacy {}")]);
    write_tar_gz(&libs.join("raw.tgz"), &[("nested/Raw.idl", "struct Raw {}")]);
    std::fs::write(libs.join("dir/Dir.idl"), "struct Dir {}").unwrap();
    std::fs::write(libs.join("dir/nested/Deep.idl"), "struct Deep {}").unwrap();
    std::fs::write(libs.join("Bare.idl"), "struct Bare {}").unwrap();
    std::fs::write(libs.join("notes.txt"), "not a schema").unwrap();

    project.write("idl/Main.idl", "include \"Common.idl\"");
    project
}

fn tree(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    quiver_common::collect_all_files(root)
        .unwrap()
        .into_iter()
        .map(|p| {
            let bytes = std::fs::read(&p).unwrap();
            (p.strip_prefix(root).unwrap().to_path_buf(), bytes)
        })
        .collect()
}

#[test]
fn every_artifact_kind_is_extracted() {
    let project = project_with_deps();
    let set = project.source_set();
    let report = Driver::new(&set).extract().unwrap();

    let files: Vec<String> = report
        .files
        .iter()
        .map(|p| quiver_common::to_slash(p))
        .collect();
    assert_eq!(
        files,
        names(&[
            "Bare.idl",
            "Common.idl",
            "Dir.idl",
            "Legacy.idl",
            "Types.idl",
            "nested/Deep.idl",
            "nested/Raw.idl",
        ])
    );
    assert_eq!(report.skipped, vec![project.root().join("libs/notes.txt")]);
}

#[test]
fn extracted_schemas_are_compiled_and_included() {
    let project = project_with_deps();
    let (result, calls) = project.build();
    result.unwrap();
    assert_eq!(
        calls,
        names(&[
            "Bare.idl",
            "Common.idl",
            "Dir.idl",
            "Legacy.idl",
            "Main.idl",
            "Types.idl",
        ])
    );

    let (result, calls) = project.build();
    result.unwrap();
    assert!(calls.is_empty(), "re-extraction is not a change: {calls:?}");
}

#[test]
fn extraction_is_idempotent() {
    let project = project_with_deps();
    let set = project.source_set();
    let driver = Driver::new(&set);

    driver.extract().unwrap();
    let first = tree(&set.extract_dir);
    driver.extract().unwrap();
    assert_eq!(tree(&set.extract_dir), first);
}

#[test]
fn later_artifact_wins_on_same_path() {
    let project = TestProject::with_source_set(
        r#"sources = ["idl"]
schemas = ["**/*.idl"]
dependencies = ["a", "b"]
"#,
    );
    project.write("a/Shared.idl", "struct First {}");
    project.write("b/Shared.idl", "struct Second {}");

    let set = project.source_set();
    Driver::new(&set).extract().unwrap();
    let content = std::fs::read_to_string(set.extract_dir.join("Shared.idl")).unwrap();
    assert_eq!(content, "struct Second {}");
}

#[test]
fn corrupt_archive_fails_the_build() {
    let project = TestProject::with_source_set(
        r#"sources = ["idl"]
schemas = ["**/*.idl"]
dependencies = ["libs/broken.jar"]
"#,
    );
    project.write("libs/broken.jar", "this is not a zip file");
    project.write("idl/A.idl", "struct A {}");

    let (result, calls) = project.build();
    assert!(matches!(result, Err(CompileError::Extract(_))));
    assert!(calls.is_empty());
}

#[test]
fn unsupported_only_dependency_still_builds() {
    let project = TestProject::with_source_set(
        r#"sources = ["idl"]
schemas = ["**/*.idl"]
files = ["**/*.idl"]
dependencies = ["libs/readme.md"]
"#,
    );
    project.write("libs/readme.md", "# docs");
    project.write("idl/A.idl", "struct A {}");

    let (result, calls) = project.build();
    let outcome = result.unwrap();
    assert_eq!(outcome.plan.extracted.skipped.len(), 1);
    assert!(outcome.plan.extracted.files.is_empty());
    assert_eq!(calls, names(&["A.idl"]));
}

#[test]
fn dependency_schema_edit_is_an_input_change() {
    let project = TestProject::with_source_set(
        r#"sources = ["idl"]
schemas = ["**/*.idl"]
files = ["*.idl"]
dependencies = ["deps"]
"#,
    );
    project.write("deps/Shared.idl", "struct Shared {}");
    project.write("idl/A.idl", "struct A {}");
    project.build().0.unwrap();

    project.write("deps/Shared.idl", "struct Shared { 1: i32 v }");
    let (result, calls) = project.build();
    result.unwrap();
    assert_eq!(calls, names(&["Shared.idl"]));
}
