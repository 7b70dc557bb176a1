//! Creating or updating the target document for one object.

use std::sync::Arc;

use databridge_doc::{Document, FormSchema};
use databridge_merge::merge_documents;
use databridge_store::{DocId, DocumentStore};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ImportError, ImportResult};
use crate::loader::ObjectRepresentation;

/// Top-level field holding the object identifier.
pub const ID_FIELD: &str = "id";

/// What applying an object did to the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "id", rename_all = "lowercase")]
pub enum ApplyOutcome {
    /// No document existed; one was created from the full object.
    Created(DocId),
    /// The existing document differed and was saved.
    Updated(DocId),
    /// The existing document already matched; nothing was written.
    Unchanged(DocId),
}

impl ApplyOutcome {
    pub fn id(&self) -> DocId {
        match *self {
            Self::Created(id) | Self::Updated(id) | Self::Unchanged(id) => id,
        }
    }
}

/// Applies loaded objects to a document store.
pub struct ObjectApplier {
    store: Arc<dyn DocumentStore>,
    dry_run: bool,
}

impl std::fmt::Debug for ObjectApplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectApplier")
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl ObjectApplier {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            dry_run: false,
        }
    }

    /// Merge and report outcomes without writing to the store.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Create the object's document, or merge the object into it.
    ///
    /// Creation writes the proper tree exactly once. An update writes at
    /// most once, and only if the merge changed a value.
    pub fn apply(&self, object: &ObjectRepresentation) -> ImportResult<ApplyOutcome> {
        let id = object_id(&object.proper)?;

        let Some(mut target) = self.store.open(id)? else {
            if !self.dry_run {
                self.store.create(id, &object.proper)?;
            }
            info!(%id, object = %object.name, dry_run = self.dry_run, "document created");
            return Ok(ApplyOutcome::Created(id));
        };

        let outcome = merge_documents(&FormSchema, &mut target, &object.proper, &object.concise);
        if !outcome.mismatches.is_empty() {
            warn!(
                %id,
                object = %object.name,
                skipped = outcome.mismatches.len(),
                "some fields did not match the target structure"
            );
        }
        if !outcome.changed {
            debug!(%id, object = %object.name, "document unchanged");
            return Ok(ApplyOutcome::Unchanged(id));
        }

        if !self.dry_run {
            self.store.save(id, &target)?;
        }
        info!(%id, object = %object.name, dry_run = self.dry_run, "document updated");
        Ok(ApplyOutcome::Updated(id))
    }
}

/// Integer identifier from the top-level `id` field.
fn object_id(proper: &Document) -> ImportResult<DocId> {
    let raw = proper.value_at(ID_FIELD);
    raw.and_then(|value| value.parse().ok())
        .ok_or_else(|| ImportError::MissingIdentifier(raw.map(str::to_owned)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::ObjectLoader;
    use databridge_form::{Form, FormRegistry};
    use databridge_store::InMemoryDocumentStore;

    const FORM: &str = r#"<SPXML-FORM>
  <collaborator>
    <id/><fullname/><email/>
    <roles><role MULTIPLE="1" PRIMARY-KEY="id"><id/><name/></role></roles>
    <phones><phone MULTIPLE="1"><kind/><number/></phone></phones>
  </collaborator>
</SPXML-FORM>"#;

    fn loader() -> ObjectLoader {
        let mut forms = FormRegistry::new();
        forms.register(Form::parse("collaborator.xmd", FORM).unwrap());
        ObjectLoader::new(Arc::new(forms))
    }

    fn object(body: &str) -> ObjectRepresentation {
        let text = format!(r#"<collaborator SPXML-FORM="collaborator.xmd">{body}</collaborator>"#);
        loader().load_text("obj", &text).unwrap()
    }

    fn setup() -> (Arc<InMemoryDocumentStore>, ObjectApplier) {
        let store = Arc::new(InMemoryDocumentStore::new());
        let applier = ObjectApplier::new(store.clone());
        (store, applier)
    }

    #[test]
    fn creates_from_full_proper_tree() {
        let (store, applier) = setup();
        let outcome = applier.apply(&object("<id>6001</id><fullname>Ada</fullname>")).unwrap();
        assert_eq!(outcome, ApplyOutcome::Created(DocId::new(6001)));
        assert_eq!(store.writes(), 1);

        let doc = store.open(DocId::new(6001)).unwrap().unwrap();
        assert_eq!(doc.value_at("fullname"), Some("Ada"));
        // Unauthored fields are present too.
        assert!(doc.find("email").is_some());
        assert!(doc.find("roles").is_some());
    }

    #[test]
    fn update_saves_once_and_reapply_is_unchanged() {
        let (store, applier) = setup();
        applier.apply(&object("<id>7</id><fullname>Ada</fullname>")).unwrap();

        let edit = object("<id>7</id><email>ada@example.org</email><roles><role><id>A</id><name>admin</name></role></roles>");
        assert_eq!(applier.apply(&edit).unwrap(), ApplyOutcome::Updated(DocId::new(7)));
        assert_eq!(store.writes(), 2);

        assert_eq!(applier.apply(&edit).unwrap(), ApplyOutcome::Unchanged(DocId::new(7)));
        assert_eq!(store.writes(), 2);

        let doc = store.open(DocId::new(7)).unwrap().unwrap();
        assert_eq!(doc.value_at("fullname"), Some("Ada"));
        assert_eq!(doc.value_at("email"), Some("ada@example.org"));
        assert_eq!(doc.value_at("roles/role/name"), Some("admin"));
    }

    #[test]
    fn default_directive_in_unkeyed_item_survives_reapply() {
        let (store, applier) = setup();
        let body = r#"<id>1</id><phones><phone><kind default="true">home</kind><number>1</number></phone></phones>"#;
        assert_eq!(applier.apply(&object(body)).unwrap(), ApplyOutcome::Created(DocId::new(1)));
        assert_eq!(applier.apply(&object(body)).unwrap(), ApplyOutcome::Unchanged(DocId::new(1)));
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn missing_or_bad_identifier() {
        let (store, applier) = setup();
        let err = applier.apply(&object("<fullname>Ada</fullname>")).unwrap_err();
        assert!(matches!(err, ImportError::MissingIdentifier(None)));

        let err = applier.apply(&object("<id>abc</id>")).unwrap_err();
        assert!(matches!(err, ImportError::MissingIdentifier(Some(ref raw)) if raw == "abc"));
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn dry_run_never_writes() {
        let (store, applier) = setup();
        let applier = applier.dry_run(true);
        let outcome = applier.apply(&object("<id>3</id>")).unwrap();
        assert_eq!(outcome, ApplyOutcome::Created(DocId::new(3)));
        assert!(store.is_empty());

        store.insert(DocId::new(3), object("<id>3</id>").proper);
        let outcome = applier.apply(&object("<id>3</id><fullname>B</fullname>")).unwrap();
        assert_eq!(outcome, ApplyOutcome::Updated(DocId::new(3)));
        assert_eq!(store.writes(), 0);
        let doc = store.open(DocId::new(3)).unwrap().unwrap();
        assert_eq!(doc.value_at("fullname"), None);
    }

    #[test]
    fn outcome_exposes_id() {
        assert_eq!(ApplyOutcome::Unchanged(DocId::new(9)).id(), DocId::new(9));
    }
}
