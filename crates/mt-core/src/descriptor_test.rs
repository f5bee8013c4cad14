use super::*;
use crate::operation::OperationKind;
use tempfile::TempDir;

fn key(s: &str) -> MigrationKey {
    MigrationKey::try_new(s).unwrap()
}

fn parse(content: &str) -> CoreResult<MigrationDescriptor> {
    MigrationDescriptor::parse(key("001_test"), Path::new("001_test.json"), content)
}

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

#[test]
fn test_parse_relaxed_object_notation() {
    let desc = parse(
        r#"{
            up: {
                create_table: {
                    name: 'Users',
                    columns: [ { name: 'Email', type: 'string' } ]
                }
            },
            down: { drop_table: 'Users' }
        }"#,
    )
    .unwrap();

    assert_eq!(desc.up.len(), 1);
    assert_eq!(desc.up[0].kind(), OperationKind::CreateTable);
    assert!(desc.has_explicit_down());
    assert_eq!(desc.down.as_ref().unwrap().len(), 1);
}

#[test]
fn test_parse_yaml_document() {
    let desc = parse(
        r#"
up:
  - add_column:
      table: Users
      columns:
        - { name: Age, type: int, nullable: true }
  - add_index:
      table_name: Users
      columns: [Age]
"#,
    )
    .unwrap();
    assert_eq!(desc.up.len(), 2);
    assert!(!desc.has_explicit_down());
}

#[test]
fn test_null_down_means_absent() {
    let desc = parse(r#"{"up": {"drop_table": "A"}, "down": null}"#).unwrap();
    assert!(desc.down.is_none());
}

#[test]
fn test_legacy_string_members() {
    let desc = parse(r#"{ up: 'CREATE TABLE x (a string)', down: 'DROP TABLE x' }"#).unwrap();
    assert_eq!(desc.up[0].kind(), OperationKind::RawShorthand);
    let up: Vec<String> = desc.up_statements().iter().map(|s| s.to_string()).collect();
    assert_eq!(up, vec!["CREATE TABLE x (a nvarchar(255))"]);
}

#[test]
fn test_down_only_descriptor() {
    let desc = parse("{ down: { drop_table: 'A' } }").unwrap();
    assert!(desc.up.is_empty());
    assert!(desc.has_explicit_down());
}

#[test]
fn test_empty_document_rejected() {
    assert!(matches!(
        parse("{ }"),
        Err(CoreError::DescriptorParse { .. })
    ));
    assert!(matches!(
        parse("[1, 2]"),
        Err(CoreError::DescriptorParse { .. })
    ));
}

#[test]
fn test_malformed_syntax_names_file() {
    let err = parse("{ up: { drop_table: 'A' ").unwrap_err();
    assert!(matches!(err, CoreError::DescriptorParse { .. }));
    assert!(err.to_string().contains("001_test.json"));
}

#[test]
fn test_invalid_operation_names_file_and_operation() {
    let err = parse("{ up: { remove_column: { table: 'A' } } }").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("001_test.json"), "{msg}");
    match err {
        CoreError::DescriptorInvalid { source, .. } => {
            assert!(
                matches!(*source, CoreError::InvalidOperation { ref operation, .. } if operation == "remove_column")
            );
        }
        other => panic!("expected DescriptorInvalid, got {other:?}"),
    }
}

#[test]
fn test_down_statements_prefer_explicit_down() {
    let desc = parse(
        "{ up: { create_table: { name: 'A', columns: [] } }, down: { execute: 'DROP TABLE A CASCADE' } }",
    )
    .unwrap();
    assert_eq!(
        desc.down_statements(),
        vec![Statement::Sql("DROP TABLE A CASCADE".to_string())]
    );
}

#[test]
fn test_down_statements_infer_when_absent() {
    let desc = parse(
        "{ up: [ { create_table: { name: 'A', columns: [] } }, { add_index: { table_name: 'A', columns: ['Id'] } } ] }",
    )
    .unwrap();
    assert_eq!(
        desc.down_statements(),
        vec![
            Statement::Sql("DROP INDEX [A].[IX_A_Id]".to_string()),
            Statement::Sql("DROP TABLE [A]".to_string()),
        ]
    );
}

#[test]
fn test_load_orders_by_key_not_discovery() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "002_x.json", "{ up: { drop_table: 'X' } }");
    write(dir.path(), "001_y.json", "{ up: { drop_table: 'Y' } }");
    write(dir.path(), "010_z.yml", "up:\n  drop_table: Z\n");

    let descriptors = load_descriptors(dir.path()).unwrap();
    let keys: Vec<&str> = descriptors.iter().map(|d| d.key.as_str()).collect();
    assert_eq!(keys, vec!["001_y", "002_x", "010_z"]);
}

#[test]
fn test_sort_descriptors_is_discovery_independent() {
    let make = |k: &str| MigrationDescriptor {
        key: key(k),
        path: PathBuf::from(format!("{k}.json")),
        up: vec![],
        down: None,
    };
    let sorted = sort_descriptors(vec![make("002_x"), make("001_y")]).unwrap();
    assert_eq!(sorted[0].key, "001_y");
    assert_eq!(sorted[1].key, "002_x");
}

#[test]
fn test_load_skips_unrelated_entries() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "001_a.json", "{ up: { drop_table: 'A' } }");
    write(dir.path(), "README.md", "# notes");
    write(dir.path(), ".001_a.json.swp", "garbage");
    std::fs::create_dir(dir.path().join("archive")).unwrap();
    write(&dir.path().join("archive"), "000_old.json", "{ up: 'x' }");

    let descriptors = load_descriptors(dir.path()).unwrap();
    assert_eq!(descriptors.len(), 1);
    assert_eq!(descriptors[0].key, "001_a");
}

#[test]
fn test_load_fails_whole_directory_on_bad_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "001_good.json", "{ up: { drop_table: 'A' } }");
    write(dir.path(), "002_bad.json", "{ up: { nonsense: true } }");

    let err = load_descriptors(dir.path()).unwrap_err();
    assert!(err.to_string().contains("002_bad.json"));
}

#[test]
fn test_load_rejects_duplicate_keys() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "001_a.json", "{ up: { drop_table: 'A' } }");
    write(dir.path(), "001_a.yml", "up: { drop_table: A }");

    let err = load_descriptors(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::DuplicateDescriptor { ref key, .. } if key == "001_a"));
}

#[test]
fn test_load_missing_directory() {
    let dir = TempDir::new().unwrap();
    let err = load_descriptors(&dir.path().join("nope")).unwrap_err();
    assert!(matches!(err, CoreError::MigrationsDirNotFound { .. }));
}

#[test]
fn test_load_empty_directory() {
    let dir = TempDir::new().unwrap();
    assert!(load_descriptors(dir.path()).unwrap().is_empty());
}
