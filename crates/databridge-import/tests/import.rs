use std::fs;
use std::path::Path;

use databridge_import::{FailureScope, ImportConfig, Importer};

const COLLABORATOR_FORM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<SPXML-FORM>
  <collaborator>
    <id TYPE="integer"/>
    <fullname TYPE="string"/>
    <email TYPE="string"/>
    <is_active TYPE="bool"/>
    <tag MULTIPLE="1"/>
    <roles>
      <role MULTIPLE="1" PRIMARY-KEY="id"><id/><name/></role>
    </roles>
    <phones>
      <phone MULTIPLE="1"><kind/><number/></phone>
    </phones>
  </collaborator>
</SPXML-FORM>
"#;

fn collaborator(id: u32, name: &str, phone: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<collaborator SPXML-FORM="x-local://wtv/wtv_collaborator.xmd">
  <id>{id}</id>
  <fullname>{name}</fullname>
  <is_active default="true">1</is_active>
  <tag>staff</tag>
  <tag>remote</tag>
  <roles>
    <role><id>admin</id><name>Administrator</name></role>
  </roles>
  <phones>
    <phone><kind>work</kind><number>{phone}</number></phone>
  </phones>
</collaborator>
"#
    )
}

fn fixture(root: &Path) -> ImportConfig {
    let config = ImportConfig {
        data_root: root.join("data"),
        store_root: root.join("store"),
        forms_root: root.join("forms"),
        ..ImportConfig::default()
    };
    fs::create_dir_all(&config.forms_root).unwrap();
    fs::write(config.forms_root.join("wtv_collaborator.xmd"), COLLABORATOR_FORM).unwrap();

    let kind = config.data_root.join("collaborators");
    fs::create_dir_all(&kind).unwrap();
    fs::write(kind.join("6001.xml"), collaborator(6001, "Ada Lovelace", "100")).unwrap();
    fs::write(kind.join("6002.xml"), collaborator(6002, "Grace Hopper", "200")).unwrap();
    fs::write(kind.join("6003.xml"), "<collaborator><id>6003</id></collaborator>").unwrap();
    config
}

fn stored(config: &ImportConfig, id: u32) -> String {
    fs::read_to_string(config.store_root.join(format!("{id}.xml"))).unwrap()
}

#[test]
fn import_twice_then_edit() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture(dir.path());
    let importer = Importer::from_config(config.clone()).unwrap();

    let first = importer.run();
    assert_eq!(first.created, 2);
    assert_eq!(first.failed, 1);
    assert_eq!(first.failures[0].scope, FailureScope::Object);
    assert!(first.failures[0].path.ends_with("6003.xml"));
    assert!(first.failures[0].message.contains("SPXML-FORM"));

    // Created from the full object: unauthored fields are stored too.
    let created = stored(&config, 6001);
    assert!(created.contains(r#"SPXML-FORM="x-local://wtv/wtv_collaborator.xmd""#));
    assert!(created.contains("<email/>"));
    assert!(created.contains("<fullname>Ada Lovelace</fullname>"));

    let second = importer.run();
    assert_eq!(second.unchanged, 2);
    assert_eq!(second.writes(), 0);
    assert_eq!(stored(&config, 6001), created);

    let kind = config.data_root.join("collaborators");
    fs::write(kind.join("6002.xml"), collaborator(6002, "Grace Hopper", "299")).unwrap();
    let third = importer.run();
    assert_eq!((third.updated, third.unchanged), (1, 1));
    assert!(stored(&config, 6002).contains("<number>299</number>"));
}

#[test]
fn merge_keeps_fields_edited_in_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture(dir.path());
    let importer = Importer::from_config(config.clone()).unwrap();
    importer.run();

    // Someone edits the stored document: fills the email, turns the flag off.
    let path = config.store_root.join("6001.xml");
    let edited = stored(&config, 6001)
        .replace("<email/>", "<email>ada@example.org</email>")
        .replace(">1</is_active>", ">0</is_active>");
    fs::write(&path, edited).unwrap();

    let report = importer.run();
    assert_eq!(report.writes(), 0);
    let after = stored(&config, 6001);
    assert!(after.contains("<email>ada@example.org</email>"));
    assert!(after.contains(">0</is_active>"));
}

#[test]
fn dry_run_leaves_store_empty() {
    let dir = tempfile::tempdir().unwrap();
    let config = ImportConfig {
        dry_run: true,
        ..fixture(dir.path())
    };
    let report = Importer::from_config(config.clone()).unwrap().run();
    assert_eq!(report.created, 2);
    assert_eq!(fs::read_dir(&config.store_root).unwrap().count(), 0);
}
