use josm_i18n::{Codec, Endianness, FormatType, MessageId, MessageText, TranslationTable};
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn langconv_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("langconv"))
}

fn write_translations(dir: &Path, format: FormatType) {
    let mut codec = Codec::new("en");
    let en: TranslationTable = [
        (MessageId::from("Open"), MessageText::from("Open")),
        (MessageId::from("Close"), MessageText::from("Close")),
        (
            MessageId::new(MessageText::with_plurals("{0} node", ["{0} nodes"])),
            MessageText::with_plurals("{0} node", ["{0} nodes"]),
        ),
    ]
    .into_iter()
    .collect();
    let de: TranslationTable = [
        (MessageId::from("Open"), MessageText::from("Öffnen")),
        (
            MessageId::new(MessageText::with_plurals("{0} node", ["{0} nodes"])),
            MessageText::with_plurals("{0} Knoten", ["{0} Knoten"]),
        ),
    ]
    .into_iter()
    .collect();
    codec.insert("en", en);
    codec.insert("de", de);
    codec.write_dir(dir, format, Endianness::Little).unwrap();
}

#[test]
fn test_mo2lang_writes_lang_files_and_stats() {
    let temp_dir = TempDir::new().unwrap();
    write_translations(temp_dir.path(), FormatType::Mo);

    let output = langconv_cmd()
        .args(["mo2lang", temp_dir.path().to_str().unwrap()])
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "Command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(temp_dir.path().join("en.lang").exists());
    assert!(temp_dir.path().join("de.lang").exists());

    let log = String::from_utf8_lossy(&output.stderr);
    assert!(log.contains("en: 3 strings (base language)"), "{log}");
    assert!(log.contains("de: 2 strings"), "{log}");
    assert!(log.contains("66.67 % translated"), "{log}");
}

#[test]
fn test_lang2mo_into_output_dir() {
    let temp_dir = TempDir::new().unwrap();
    let mo_dir = temp_dir.path().join("mo");
    write_translations(temp_dir.path(), FormatType::Lang);

    let output = langconv_cmd()
        .args([
            "lang2mo",
            temp_dir.path().to_str().unwrap(),
            mo_dir.to_str().unwrap(),
            "--big-endian",
        ])
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "Command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let de = fs::read(mo_dir.join("de.mo")).unwrap();
    assert_eq!(&de[..4], &[0x95, 0x04, 0x12, 0xde]);
    assert!(mo_dir.join("en.mo").exists());
}

#[test]
fn test_lang2mo_requires_base_language() {
    let temp_dir = TempDir::new().unwrap();
    write_translations(temp_dir.path(), FormatType::Lang);
    fs::remove_file(temp_dir.path().join("en.lang")).unwrap();

    let output = langconv_cmd()
        .args(["lang2mo", temp_dir.path().to_str().unwrap()])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("en.lang"));
}

#[test]
fn test_po2mo_with_json_stats() {
    let temp_dir = TempDir::new().unwrap();
    write_translations(temp_dir.path(), FormatType::Po);

    let output = langconv_cmd()
        .args(["po2mo", temp_dir.path().to_str().unwrap(), "--json"])
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "Command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["base_language"], "en");
    assert_eq!(stats["base_messages"], 3);
    assert_eq!(stats["languages"][0]["language"], "de");
    assert_eq!(stats["languages"][0]["translated"], 2);
    assert!(temp_dir.path().join("de.mo").exists());
}

#[test]
fn test_missing_input() {
    let temp_dir = TempDir::new().unwrap();
    let output = langconv_cmd()
        .args(["mo2po", temp_dir.path().join("missing").to_str().unwrap()])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

#[test]
fn test_unknown_subcommand() {
    let output = langconv_cmd().args(["po2xml", "."]).output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_shorten_po() {
    let temp_dir = TempDir::new().unwrap();
    let po_file = temp_dir.path().join("de.po");
    fs::write(
        &po_file,
        "# SOME DESCRIPTIVE TITLE.\n#: src/Main.java:1\nmsgid \"Open\"\nmsgstr \"Öffnen\"\n",
    )
    .unwrap();

    let output = langconv_cmd()
        .args([
            "shorten-po",
            po_file.to_str().unwrap(),
            "--package-name",
            "pt_assistant",
        ])
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "Command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        fs::read_to_string(&po_file).unwrap(),
        "# Translations for the JOSM plugin 'pt_assistant' (de)\nmsgid \"Open\"\nmsgstr \"Öffnen\"\n"
    );
}
