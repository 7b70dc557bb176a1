//! Walking a data root and importing every object in it.
//!
//! The data root holds one directory per object kind and each kind
//! directory holds object files. Anything else is skipped with a warning.
//! A failing object or directory is logged and recorded; the run always
//! finishes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use databridge_form::FormRegistry;
use databridge_store::{DocumentStore, FsDocumentStore};
use tracing::{debug, error, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::applier::{ApplyOutcome, ObjectApplier};
use crate::config::ImportConfig;
use crate::error::{ImportError, ImportResult};
use crate::loader::ObjectLoader;
use crate::report::{FailureScope, ImportReport};

/// Drives loading and applying over a directory tree, one object at a time.
#[derive(Debug)]
pub struct Importer {
    loader: ObjectLoader,
    applier: ObjectApplier,
    config: ImportConfig,
}

impl Importer {
    pub fn new(
        forms: Arc<FormRegistry>,
        store: Arc<dyn DocumentStore>,
        config: ImportConfig,
    ) -> Self {
        Self {
            loader: ObjectLoader::new(forms),
            applier: ObjectApplier::new(store).dry_run(config.dry_run),
            config,
        }
    }

    /// Load the forms directory and open the filesystem store that `config`
    /// names.
    pub fn from_config(config: ImportConfig) -> ImportResult<Self> {
        let forms = Arc::new(FormRegistry::load_dir(&config.forms_root)?);
        info!(
            forms = forms.len(),
            root = %config.forms_root.display(),
            "forms loaded"
        );
        let store = FsDocumentStore::open_dir(&config.store_root, Arc::clone(&forms))?;
        Ok(Self::new(forms, Arc::new(store), config))
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Import everything under the configured data root.
    pub fn run(&self) -> ImportReport {
        self.run_at(&self.config.data_root)
    }

    /// Import everything under `data_root`.
    pub fn run_at(&self, data_root: &Path) -> ImportReport {
        let mut report = ImportReport::default();
        info!(root = %data_root.display(), dry_run = self.config.dry_run, "import started");

        // A missing root surfaces through the walk; a regular file would list nothing.
        if data_root.exists() && !data_root.is_dir() {
            enumeration_failed(&mut report, data_root.to_path_buf(), "not a directory".into());
            return report;
        }

        for entry in list(data_root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    directory_failed(&mut report, data_root, &err);
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                warn!(entry = %entry.path().display(), "not a kind directory; skipped");
                report.skipped += 1;
                continue;
            }
            self.import_kind(entry.path(), &mut report);
        }

        info!(
            created = report.created,
            updated = report.updated,
            unchanged = report.unchanged,
            failed = report.failed,
            skipped = report.skipped,
            "import finished"
        );
        report
    }

    /// Load and apply a single object file.
    pub fn import_object(&self, path: &Path) -> ImportResult<ApplyOutcome> {
        let object = self.loader.load(path)?;
        self.applier.apply(&object)
    }

    fn import_kind(&self, dir: &Path, report: &mut ImportReport) {
        let entries = match list(dir).collect::<Result<Vec<DirEntry>, _>>() {
            Ok(entries) => entries,
            Err(err) => {
                directory_failed(report, dir, &err);
                return;
            }
        };

        for entry in entries {
            let path = entry.path();
            if entry.file_type().is_dir() {
                warn!(entry = %path.display(), "nested directories are not supported; skipped");
                report.skipped += 1;
                continue;
            }
            if !self.config.recognizes(path) {
                warn!(entry = %path.display(), "unrecognized file type; skipped");
                report.skipped += 1;
                continue;
            }

            match self.import_object(path) {
                Ok(outcome) => report.record(&outcome),
                Err(err) => {
                    error!(object = %path.display(), error = %err, "object not imported");
                    report.record_failure(FailureScope::Object, path, &err);
                }
            }
        }

        report.directories += 1;
        debug!(dir = %dir.display(), "directory loaded");
    }
}

/// Direct children of `dir`, sorted by file name.
fn list(dir: &Path) -> walkdir::IntoIter {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
}

fn directory_failed(report: &mut ImportReport, dir: &Path, err: &walkdir::Error) {
    let path = err.path().unwrap_or(dir).to_path_buf();
    let reason = err
        .io_error()
        .map(ToString::to_string)
        .unwrap_or_else(|| err.to_string());
    enumeration_failed(report, path, reason);
}

fn enumeration_failed(report: &mut ImportReport, path: PathBuf, reason: String) {
    let err = ImportError::DirectoryEnumeration {
        path: path.clone(),
        reason,
    };
    error!(error = %err, "directory not imported");
    report.record_failure(FailureScope::Directory, &path, &err);
}

#[cfg(test)]
mod tests {
    use super::*;
    use databridge_form::Form;
    use databridge_store::{DocId, InMemoryDocumentStore};
    use std::fs;

    fn forms() -> Arc<FormRegistry> {
        let mut forms = FormRegistry::new();
        forms.register(
            Form::parse(
                "person.xmd",
                "<SPXML-FORM><person><id/><name/></person></SPXML-FORM>",
            )
            .unwrap(),
        );
        Arc::new(forms)
    }

    fn person(id: &str, name: &str) -> String {
        format!(r#"<person SPXML-FORM="person.xmd"><id>{id}</id><name>{name}</name></person>"#)
    }

    fn importer(store: &Arc<InMemoryDocumentStore>) -> Importer {
        Importer::new(forms(), store.clone(), ImportConfig::default())
    }

    fn data_root() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("data");
        let people = root.join("people");
        fs::create_dir_all(people.join("nested")).unwrap();
        fs::write(root.join("README.txt"), "not a kind").unwrap();
        fs::write(people.join("1.xml"), person("1", "Ada")).unwrap();
        fs::write(people.join("2.XML"), person("2", "Grace")).unwrap();
        fs::write(people.join("3.xml"), "<person><id>3</id></person>").unwrap();
        fs::write(people.join("notes.md"), "skip me").unwrap();
        (dir, root)
    }

    #[test]
    fn imports_recognized_objects_and_isolates_failures() {
        let (_dir, root) = data_root();
        let store = Arc::new(InMemoryDocumentStore::new());
        let report = importer(&store).run_at(&root);

        assert_eq!(report.created, 2);
        assert_eq!(report.failed, 1);
        // README.txt, nested/, notes.md
        assert_eq!(report.skipped, 3);
        assert_eq!(report.directories, 1);
        assert_eq!(report.failures[0].scope, FailureScope::Object);
        assert!(report.failures[0].path.ends_with("3.xml"));
        assert_eq!(store.all_ids(), [DocId::new(1), DocId::new(2)]);
    }

    #[test]
    fn second_run_writes_nothing() {
        let (_dir, root) = data_root();
        let store = Arc::new(InMemoryDocumentStore::new());
        let importer = importer(&store);
        importer.run_at(&root);
        let writes = store.writes();

        let report = importer.run_at(&root);
        assert_eq!(report.unchanged, 2);
        assert_eq!(report.writes(), 0);
        assert_eq!(store.writes(), writes);
    }

    #[test]
    fn changed_object_is_updated() {
        let (_dir, root) = data_root();
        let store = Arc::new(InMemoryDocumentStore::new());
        let importer = importer(&store);
        importer.run_at(&root);

        fs::write(root.join("people/2.XML"), person("2", "Grace Hopper")).unwrap();
        let report = importer.run_at(&root);
        assert_eq!((report.updated, report.unchanged), (1, 1));
        let doc = store.open(DocId::new(2)).unwrap().unwrap();
        assert_eq!(doc.value_at("name"), Some("Grace Hopper"));
    }

    #[test]
    fn missing_data_root_is_a_directory_failure() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(InMemoryDocumentStore::new());
        let report = importer(&store).run_at(&dir.path().join("absent"));

        assert_eq!(report.objects(), 0);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].scope, FailureScope::Directory);
        assert!(report.failures[0].path.ends_with("absent"));
    }

    #[test]
    fn data_root_that_is_a_file_is_a_directory_failure() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("objects.xml");
        std::fs::write(&file, "<person/>").unwrap();
        let store = Arc::new(InMemoryDocumentStore::new());
        let report = importer(&store).run_at(&file);

        assert_eq!(report.objects(), 0);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].scope, FailureScope::Directory);
        assert_eq!(report.failures[0].path, file);
        assert!(report.failures[0].message.contains("not a directory"));
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn dry_run_reports_without_writing() {
        let (_dir, root) = data_root();
        let store = Arc::new(InMemoryDocumentStore::new());
        let config = ImportConfig {
            dry_run: true,
            ..ImportConfig::default()
        };
        let report = Importer::new(forms(), store.clone(), config).run_at(&root);
        assert_eq!(report.created, 2);
        assert!(store.is_empty());
    }

    #[test]
    fn extra_extensions_are_recognized() {
        let (_dir, root) = data_root();
        fs::write(root.join("people/4.obj"), person("4", "Linus")).unwrap();
        let store = Arc::new(InMemoryDocumentStore::new());
        let config = ImportConfig {
            extensions: vec!["xml".into(), "obj".into()],
            ..ImportConfig::default()
        };
        let report = Importer::new(forms(), store.clone(), config).run_at(&root);
        assert_eq!(report.created, 3);
        assert!(store.exists(DocId::new(4)).unwrap());
    }
}
