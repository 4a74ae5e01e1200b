use std::fs;
use tempfile::{tempdir, NamedTempFile};
use vpzconv::conversion::batch::{convert_batch_files, BatchObserver};
use vpzconv::conversion::{ConversionConfig, ConversionEngine, ConversionOutcome};
use vpzconv::error::{ConversionError, ConversionErrorKind};
use vpzconv::parser::VpzSource;

const LEGACY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<vle_project>
  <experiment name="exp" begin="0" duration="100">
    <conditions/>
  </experiment>
</vle_project>
"#;

#[test]
fn test_file_is_rewritten_in_place() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.vpz");
    fs::write(&path, LEGACY).unwrap();

    let engine = ConversionEngine::new(ConversionConfig::default());
    let data = engine.convert_file(&path).unwrap();
    assert!(data.outcome.is_converted());

    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(Some(&written), data.content.as_ref());
    assert!(written.contains("simulation_engine"));
    assert!(written.contains("vle-1.2.0.dtd"));

    // No staging file left behind
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_direct_write_mode() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.vpz");
    fs::write(&path, LEGACY).unwrap();

    let config = ConversionConfig::default().with_atomic_write(false);
    ConversionEngine::new(config).convert_file(&path).unwrap();
    assert!(fs::read_to_string(&path).unwrap().contains("simulation_engine"));
}

#[test]
fn test_skipped_file_is_not_touched() {
    let tmp = NamedTempFile::new().unwrap();
    let original = "<root>\n  <experiment begin=\"0\"/>\n</root>\n";
    fs::write(tmp.path(), original).unwrap();

    let engine = ConversionEngine::new(ConversionConfig::default());
    let data = engine.convert_file(tmp.path()).unwrap();
    assert_eq!(data.outcome, ConversionOutcome::NotMatchingFormat);
    assert_eq!(fs::read_to_string(tmp.path()).unwrap(), original);
}

#[test]
fn test_invalid_xml_is_a_parse_error() {
    let tmp = NamedTempFile::new().unwrap();
    fs::write(tmp.path(), "<vle_project><experiment></vle_project>").unwrap();

    let engine = ConversionEngine::new(ConversionConfig::default());
    let err = engine.convert_file(tmp.path()).unwrap_err();
    assert!(matches!(err, ConversionError::ParseError(_)));
    assert!(err.user_message().starts_with("XML parse error"));
}

#[test]
fn test_missing_file_is_an_io_error() {
    let engine = ConversionEngine::new(ConversionConfig::default());
    let source = VpzSource::File("/no/such/dir/model.vpz".into());
    let err = engine.convert_source(&source).unwrap_err();
    assert!(matches!(
        err,
        ConversionError::Conversion {
            kind: ConversionErrorKind::Io { .. },
            ..
        }
    ));
}

#[test]
fn test_oversized_file_is_rejected_before_reading() {
    let tmp = NamedTempFile::new().unwrap();
    fs::write(tmp.path(), LEGACY).unwrap();

    let config = ConversionConfig::default().with_max_file_size(16);
    let err = ConversionEngine::new(config)
        .convert_file(tmp.path())
        .unwrap_err();
    assert!(matches!(
        err,
        ConversionError::Conversion {
            kind: ConversionErrorKind::FileTooLarge { limit: 16, .. },
            ..
        }
    ));
    assert_eq!(fs::read_to_string(tmp.path()).unwrap(), LEGACY);
}

struct Quiet;

impl BatchObserver for Quiet {}

fn make_read_only(path: &std::path::Path) {
    let mut permissions = fs::metadata(path).unwrap().permissions();
    permissions.set_readonly(true);
    fs::set_permissions(path, permissions).unwrap();
}

#[test]
fn test_read_only_file_is_a_write_error() {
    for atomic in [true, false] {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locked.vpz");
        fs::write(&path, LEGACY).unwrap();
        make_read_only(&path);

        let config = ConversionConfig::default().with_atomic_write(atomic);
        let err = ConversionEngine::new(config).convert_file(&path).unwrap_err();
        assert!(
            matches!(
                err,
                ConversionError::Conversion {
                    kind: ConversionErrorKind::Write { .. },
                    ..
                }
            ),
            "atomic={}: {:?}",
            atomic,
            err
        );
        assert!(err.user_message().starts_with("Cannot write file"));
        assert_eq!(fs::read_to_string(&path).unwrap(), LEGACY);
        assert!(fs::metadata(&path).unwrap().permissions().readonly());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}

#[test]
fn test_write_failure_does_not_stop_batch() {
    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked.vpz");
    let open = dir.path().join("open.vpz");
    fs::write(&locked, LEGACY).unwrap();
    fs::write(&open, LEGACY).unwrap();
    make_read_only(&locked);

    let engine = ConversionEngine::new(ConversionConfig::default());
    let report = convert_batch_files(&engine, &[locked.clone(), open.clone()], &mut Quiet);

    assert_eq!(report.stats.failed, 1);
    assert_eq!(report.stats.converted, 1);
    assert_eq!(fs::read_to_string(&locked).unwrap(), LEGACY);
    assert!(fs::read_to_string(&open).unwrap().contains("simulation_engine"));
}

#[cfg(unix)]
#[test]
fn test_symlink_target_is_rewritten() {
    use std::os::unix::fs::symlink;

    let dir = tempdir().unwrap();
    let real = dir.path().join("real.vpz");
    let link = dir.path().join("link.vpz");
    fs::write(&real, LEGACY).unwrap();
    symlink(&real, &link).unwrap();

    let engine = ConversionEngine::new(ConversionConfig::default());
    assert!(engine.convert_file(&link).unwrap().outcome.is_converted());

    assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert!(fs::read_to_string(&real).unwrap().contains("simulation_engine"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[cfg(unix)]
#[test]
fn test_atomic_rewrite_keeps_file_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let path = dir.path().join("shared.vpz");
    fs::write(&path, LEGACY).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

    let engine = ConversionEngine::new(ConversionConfig::default());
    engine.convert_file(&path).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o640);
    assert!(fs::read_to_string(&path).unwrap().contains("simulation_engine"));
}

#[test]
fn test_latin1_project_is_converted_to_utf8() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("latin1.vpz");
    fs::write(
        &path,
        b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><vle_project author=\"Andr\xe9\"><experiment begin=\"0\" duration=\"10\"/><conditions/></vle_project>",
    )
    .unwrap();

    let engine = ConversionEngine::new(ConversionConfig::default());
    assert!(engine.convert_file(&path).unwrap().outcome.is_converted());

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains(r#"encoding="UTF-8""#));
    assert!(written.contains("author=\"Andr\u{e9}\""));
}
