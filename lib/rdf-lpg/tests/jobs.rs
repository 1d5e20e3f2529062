#![cfg(test)]
#![allow(clippy::panic_in_result_fn)]

use async_trait::async_trait;
use rdf_lpg::common::error::StorageError;
use rdf_lpg::common::{
    Direction, GraphStore, GraphTransaction, MappingStore, NodeId, Relationship, RelationshipId,
};
use rdf_lpg::delete::Deleter;
use rdf_lpg::error::JobError;
use rdf_lpg::import::Importer;
use rdf_lpg::io::RdfFormat;
use rdf_lpg::mapping::error::MappingError;
use rdf_lpg::mapping::{
    CommitBatchSize, MappingPolicy, MultivalHandling, RdfTypeHandling, UriHandling,
};
use rdf_lpg::model::{PropertyValue, TypedValue};
use rdf_lpg::storage::memory::MemGraphStore;
use rdf_lpg::summary::{DeleteSummary, ImportSummary};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const ANN: &str = "http://example.com/ann";
const BOB: &str = "http://example.com/bob";

const PERSON_DATA: &str = r#"
@prefix ex: <http://example.com/> .

ex:ann a ex:Person ;
    ex:name "Ann" ;
    ex:likes ex:bob .
"#;

fn ignore_namespaces() -> MappingPolicy {
    MappingPolicy::default().with_uri_handling(UriHandling::Ignore)
}

fn tags_as_array() -> MappingPolicy {
    ignore_namespaces()
        .with_multival(MultivalHandling::Array)
        .with_multival_allow_list(["http://example.com/tag"])
}

fn batches_of(size: usize) -> CommitBatchSize {
    CommitBatchSize::Bounded(NonZeroUsize::new(size).unwrap())
}

fn strings(values: &[&str]) -> PropertyValue {
    PropertyValue::Array(values.iter().map(|value| TypedValue::from(*value)).collect())
}

async fn import(
    store: &MemGraphStore,
    policy: MappingPolicy,
    data: &str,
) -> Result<ImportSummary, JobError> {
    Importer::new(store, policy)
        .import_from_reader(RdfFormat::Turtle, data.as_bytes())
        .await
}

async fn delete(
    store: &MemGraphStore,
    policy: MappingPolicy,
    data: &str,
) -> Result<DeleteSummary, JobError> {
    Deleter::new(store, policy)
        .delete_from_reader(RdfFormat::Turtle, data.as_bytes())
        .await
}

#[tokio::test]
async fn test_import_creates_labels_properties_and_relationships() -> Result<(), Box<dyn Error>> {
    let store = MemGraphStore::new();
    let summary = import(&store, ignore_namespaces(), PERSON_DATA).await?;
    assert_eq!(summary.triples_parsed, 3);
    assert_eq!(summary.triples_mapped, 3);
    assert!(summary.namespaces.is_empty());

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.node_count(), 2);
    let ann = snapshot.find_by_uri(ANN).unwrap();
    assert_eq!(
        ann.labels,
        BTreeSet::from(["Person".to_owned(), "Resource".to_owned()])
    );
    assert_eq!(
        ann.property("name"),
        Some(&PropertyValue::Scalar(TypedValue::from("Ann")))
    );
    let bob = snapshot.find_by_uri(BOB).unwrap();
    assert_eq!(bob.labels, BTreeSet::from(["Resource".to_owned()]));
    assert_eq!(
        snapshot.relationship_triples(),
        BTreeSet::from([(ANN.to_owned(), "likes".to_owned(), BOB.to_owned())])
    );
    Ok(())
}

#[tokio::test]
async fn test_import_is_idempotent_and_overwrites_scalars() -> Result<(), Box<dyn Error>> {
    let store = MemGraphStore::new();
    import(&store, ignore_namespaces(), PERSON_DATA).await?;
    import(&store, ignore_namespaces(), PERSON_DATA).await?;
    import(
        &store,
        ignore_namespaces(),
        r#"<http://example.com/ann> <http://example.com/name> "Anna" ."#,
    )
    .await?;

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.node_count(), 2);
    assert_eq!(snapshot.relationship_count(), 1);
    assert_eq!(
        snapshot.find_by_uri(ANN).unwrap().property("name"),
        Some(&PropertyValue::Scalar(TypedValue::from("Anna")))
    );
    Ok(())
}

#[tokio::test]
async fn test_delete_removes_everything_imported() -> Result<(), Box<dyn Error>> {
    let store = MemGraphStore::new();
    import(&store, ignore_namespaces(), PERSON_DATA).await?;

    let summary = delete(&store, ignore_namespaces(), PERSON_DATA).await?;
    assert_eq!(summary.triples_mapped, 3);
    assert_eq!(summary.not_deleted, 0);
    assert_eq!(summary.triples_deleted(), 3);
    assert_eq!(summary.extra_info, None);
    assert!(store.snapshot().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_delete_keeps_nodes_with_other_properties() -> Result<(), Box<dyn Error>> {
    let store = MemGraphStore::new();
    import(&store, ignore_namespaces(), PERSON_DATA).await?;

    let summary = delete(
        &store,
        ignore_namespaces(),
        r#"<http://example.com/ann> <http://example.com/likes> <http://example.com/bob> ."#,
    )
    .await?;
    assert_eq!(summary.not_deleted, 0);

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.relationship_count(), 0);
    assert!(snapshot.find_by_uri(BOB).is_none());
    let ann = snapshot.find_by_uri(ANN).unwrap();
    assert!(ann.has_label("Person"));
    assert!(ann.property("name").is_some());
    Ok(())
}

#[tokio::test]
async fn test_delete_array_values_one_by_one() -> Result<(), Box<dyn Error>> {
    let store = MemGraphStore::new();
    import(
        &store,
        tags_as_array(),
        r#"<http://example.com/ann> <http://example.com/tag> "x", "y" ."#,
    )
    .await?;
    assert_eq!(
        store.snapshot().await.find_by_uri(ANN).unwrap().property("tag"),
        Some(&strings(&["x", "y"]))
    );

    delete(
        &store,
        tags_as_array(),
        r#"<http://example.com/ann> <http://example.com/tag> "x" ."#,
    )
    .await?;
    assert_eq!(
        store.snapshot().await.find_by_uri(ANN).unwrap().property("tag"),
        Some(&strings(&["y"]))
    );

    let summary = delete(
        &store,
        tags_as_array(),
        r#"<http://example.com/ann> <http://example.com/tag> "y" ."#,
    )
    .await?;
    assert_eq!(summary.not_deleted, 0);
    let ann = store.snapshot().await.find_by_uri(ANN).unwrap();
    assert_eq!(ann.property("tag"), None);
    Ok(())
}

#[tokio::test]
async fn test_delete_preserves_co_located_values() -> Result<(), Box<dyn Error>> {
    let store = MemGraphStore::new();
    import(
        &store,
        tags_as_array(),
        r#"
        <http://example.com/ann> <http://example.com/tag> "a", "b", "c" .
        <http://example.com/ann> <http://example.com/name> "Ann" .
        "#,
    )
    .await?;

    let summary = delete(
        &store,
        tags_as_array(),
        r#"<http://example.com/ann> <http://example.com/tag> "b", "z" ."#,
    )
    .await?;
    assert_eq!(summary.triples_mapped, 2);
    assert_eq!(summary.not_deleted, 1);

    let ann = store.snapshot().await.find_by_uri(ANN).unwrap();
    assert_eq!(ann.property("tag"), Some(&strings(&["a", "c"])));
    assert_eq!(
        ann.property("name"),
        Some(&PropertyValue::Scalar(TypedValue::from("Ann")))
    );
    Ok(())
}

#[tokio::test]
async fn test_delete_counts_missing_statements() -> Result<(), Box<dyn Error>> {
    let store = MemGraphStore::new();
    import(&store, ignore_namespaces(), PERSON_DATA).await?;

    let summary = delete(
        &store,
        ignore_namespaces(),
        r#"
        @prefix ex: <http://example.com/> .
        ex:nobody ex:name "Nobody" ; a ex:Person .
        ex:ann a ex:Robot ; ex:likes ex:carl .
        "#,
    )
    .await?;
    assert_eq!(summary.triples_mapped, 4);
    assert_eq!(summary.not_deleted, 4);
    assert_eq!(summary.triples_deleted(), 0);
    assert_eq!(summary.extra_info, None);
    assert_eq!(store.snapshot().await.node_count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_delete_skips_blank_nodes() -> Result<(), Box<dyn Error>> {
    let data = r#"
    @prefix ex: <http://example.com/> .
    _:someone ex:name "Someone" ; ex:knows ex:ann .
    ex:ann ex:name "Ann" .
    "#;
    let store = MemGraphStore::new();
    import(&store, ignore_namespaces(), data).await?;
    assert_eq!(store.snapshot().await.node_count(), 2);

    let summary = delete(&store, ignore_namespaces(), data).await?;
    assert_eq!(summary.triples_mapped, 3);
    assert_eq!(summary.not_deleted, 2);
    assert_eq!(
        summary.extra_info.as_deref(),
        Some("2 of the statements could not be deleted, due to containing a blank node.")
    );

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.relationship_count(), 1);
    assert_eq!(snapshot.find_by_uri(ANN).unwrap().property("name"), None);
    Ok(())
}

#[tokio::test]
async fn test_delete_one_of_many_incoming_relationships() -> Result<(), Box<dyn Error>> {
    let store = MemGraphStore::new();
    import(
        &store,
        ignore_namespaces(),
        r#"
        @prefix ex: <http://example.com/> .
        ex:a ex:likes ex:bob .
        ex:c ex:likes ex:bob .
        ex:d ex:likes ex:bob .
        "#,
    )
    .await?;

    let summary = delete(
        &store,
        ignore_namespaces(),
        "<http://example.com/a> <http://example.com/likes> <http://example.com/bob> .",
    )
    .await?;
    assert_eq!(summary.not_deleted, 0);

    let snapshot = store.snapshot().await;
    assert_eq!(
        snapshot.relationship_triples(),
        BTreeSet::from([
            (
                "http://example.com/c".to_owned(),
                "likes".to_owned(),
                BOB.to_owned()
            ),
            (
                "http://example.com/d".to_owned(),
                "likes".to_owned(),
                BOB.to_owned()
            ),
        ])
    );
    assert!(snapshot.find_by_uri("http://example.com/a").is_none());
    Ok(())
}

#[tokio::test]
async fn test_nodes_emptied_after_their_relationships_are_kept() -> Result<(), Box<dyn Error>> {
    let store = MemGraphStore::new();
    import(&store, ignore_namespaces(), PERSON_DATA).await?;

    // The relationship goes in the first batch, the last property of ann in a later one.
    let summary = delete(
        &store,
        ignore_namespaces().with_commit_batch_size(batches_of(1)),
        r#"
        @prefix ex: <http://example.com/> .
        ex:ann ex:likes ex:bob .
        ex:ann a ex:Person ;
            ex:name "Ann" .
        "#,
    )
    .await?;
    assert_eq!(summary.not_deleted, 0);

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.node_count(), 1);
    let ann = snapshot.find_by_uri(ANN).unwrap();
    assert_eq!(ann.property("name"), None);
    assert!(!ann.has_label("Person"));
    assert!(snapshot.find_by_uri(BOB).is_none());
    Ok(())
}

#[tokio::test]
async fn test_prefixes_are_stable_across_jobs() -> Result<(), Box<dyn Error>> {
    let store = MemGraphStore::new();
    let summary = import(&store, MappingPolicy::default(), PERSON_DATA).await?;
    assert_eq!(
        summary.namespaces,
        BTreeMap::from([("ns0".to_owned(), "http://example.com/".to_owned())])
    );
    let ann = store.snapshot().await.find_by_uri(ANN).unwrap();
    assert!(ann.has_label("ns0__Person"));
    assert!(ann.property("ns0__name").is_some());

    let summary = import(
        &store,
        MappingPolicy::default(),
        r#"<http://example.com/ann> <http://other.example.com/age> 41 ."#,
    )
    .await?;
    assert_eq!(summary.namespaces.len(), 2);
    assert_eq!(
        summary.namespaces.get("ns1").map(String::as_str),
        Some("http://other.example.com/")
    );
    assert_eq!(store.load_namespaces().await?.len(), 2);

    let summary = delete(&store, MappingPolicy::default(), PERSON_DATA).await?;
    assert_eq!(summary.not_deleted, 0);
    let ann = store.snapshot().await.find_by_uri(ANN).unwrap();
    assert_eq!(
        ann.property("ns1__age"),
        Some(&PropertyValue::Scalar(TypedValue::Integer(41)))
    );
    assert!(!ann.has_label("ns0__Person"));
    Ok(())
}

#[tokio::test]
async fn test_strict_shortening_requires_defined_prefixes() -> Result<(), Box<dyn Error>> {
    let policy = MappingPolicy::default().with_uri_handling(UriHandling::ShortenStrict);
    let store = MemGraphStore::new();
    let result = import(&store, policy.clone(), PERSON_DATA).await;
    assert!(matches!(
        result,
        Err(JobError::Mapping(MappingError::UndefinedNamespace { .. }))
    ));
    assert!(store.snapshot().await.is_empty());

    store
        .save_namespaces(&[("ex".to_owned(), "http://example.com/".to_owned())])
        .await?;
    import(&store, policy, PERSON_DATA).await?;
    let ann = store.snapshot().await.find_by_uri(ANN).unwrap();
    assert!(ann.has_label("ex__Person"));
    Ok(())
}

#[tokio::test]
async fn test_vocabulary_mappings() -> Result<(), Box<dyn Error>> {
    let store = MemGraphStore::new().with_vocabulary_mappings([
        ("http://example.com/name", "fullName"),
        ("http://example.com/likes", "LIKES"),
    ]);
    let policy = MappingPolicy::default().with_uri_handling(UriHandling::Map);
    import(&store, policy, PERSON_DATA).await?;

    let snapshot = store.snapshot().await;
    let ann = snapshot.find_by_uri(ANN).unwrap();
    assert!(ann.property("fullName").is_some());
    assert!(ann.has_label("Person"));
    assert_eq!(
        snapshot.relationship_triples(),
        BTreeSet::from([(ANN.to_owned(), "LIKES".to_owned(), BOB.to_owned())])
    );
    Ok(())
}

#[tokio::test]
async fn test_types_as_labels_and_nodes() -> Result<(), Box<dyn Error>> {
    let store = MemGraphStore::new();
    let policy = ignore_namespaces().with_rdf_type_handling(RdfTypeHandling::LabelsAndNodes);
    import(&store, policy, PERSON_DATA).await?;

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.node_count(), 3);
    assert!(snapshot.find_by_uri(ANN).unwrap().has_label("Person"));
    assert!(snapshot
        .find_by_uri("http://example.com/Person")
        .is_some());
    assert!(snapshot.relationship_triples().contains(&(
        ANN.to_owned(),
        "type".to_owned(),
        "http://example.com/Person".to_owned()
    )));
    Ok(())
}

#[tokio::test]
async fn test_import_in_several_batches() -> Result<(), Box<dyn Error>> {
    let store = MemGraphStore::new();
    let policy = tags_as_array().with_commit_batch_size(batches_of(2));
    let summary = import(
        &store,
        policy.clone(),
        r#"
        @prefix ex: <http://example.com/> .
        ex:ann ex:tag "a" ; ex:likes ex:bob ; ex:tag "b" .
        ex:bob ex:tag "c" ; ex:name "Bob" .
        "#,
    )
    .await?;
    assert_eq!(summary.triples_mapped, 5);

    let snapshot = store.snapshot().await;
    assert_eq!(
        snapshot.find_by_uri(ANN).unwrap().property("tag"),
        Some(&strings(&["a", "b"]))
    );
    assert_eq!(
        snapshot.find_by_uri(BOB).unwrap().property("tag"),
        Some(&strings(&["c"]))
    );
    assert_eq!(snapshot.relationship_count(), 1);

    // Arrays of later jobs are appended.
    import(
        &store,
        policy,
        r#"<http://example.com/ann> <http://example.com/tag> "d" ."#,
    )
    .await?;
    assert_eq!(
        store.snapshot().await.find_by_uri(ANN).unwrap().property("tag"),
        Some(&strings(&["a", "b", "d"]))
    );
    Ok(())
}

#[tokio::test]
async fn test_failed_commit_aborts_the_job() -> Result<(), Box<dyn Error>> {
    let store = FailingStore::new(1);
    let result = Importer::new(&store, tags_as_array().with_commit_batch_size(batches_of(2)))
        .import_from_reader(
            RdfFormat::NTriples,
            r#"
            <http://example.com/ann> <http://example.com/tag> "a" .
            <http://example.com/ann> <http://example.com/tag> "b" .
            <http://example.com/ann> <http://example.com/tag> "c" .
            <http://example.com/ann> <http://example.com/tag> "d" .
            <http://example.com/ann> <http://example.com/tag> "e" .
            "#
            .as_bytes(),
        )
        .await;
    assert!(matches!(result, Err(JobError::Storage(StorageError::Other(_)))));

    // The first batch stays, the failed one is rolled back.
    let snapshot = store.inner.snapshot().await;
    assert_eq!(
        snapshot.find_by_uri(ANN).unwrap().property("tag"),
        Some(&strings(&["a", "b"]))
    );
    Ok(())
}

#[tokio::test]
async fn test_invalid_literal_fails_the_job() -> Result<(), Box<dyn Error>> {
    let store = MemGraphStore::new();
    let result = import(
        &store,
        ignore_namespaces(),
        r#"
        @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
        <http://example.com/ann> <http://example.com/age> "forty"^^xsd:integer .
        "#,
    )
    .await;
    assert!(matches!(
        result,
        Err(JobError::Mapping(MappingError::InvalidLiteral { .. }))
    ));
    Ok(())
}

#[tokio::test]
async fn test_concurrent_imports_never_share_a_prefix() -> Result<(), Box<dyn Error>> {
    let store = YieldingStore {
        inner: MemGraphStore::new(),
    };
    let importer = Importer::new(&store, MappingPolicy::default());
    let first = r#"<http://a.example/x> <http://a.example/p> "1" ."#;
    let second = r#"<http://b.example/y> <http://b.example/q> "2" ."#;
    let (first_result, second_result) = tokio::join!(
        importer.import_from_reader(RdfFormat::NTriples, first.as_bytes()),
        importer.import_from_reader(RdfFormat::NTriples, second.as_bytes()),
    );

    // Both jobs allocate ns0. The one committing last conflicts and leaves no data behind.
    let namespaces = store.inner.load_namespaces().await?;
    assert_eq!(namespaces.len(), 1);
    assert_eq!(namespaces[0].0, "ns0");
    let (won, lost, lost_data) = if namespaces[0].1 == "http://a.example/" {
        (first_result, second_result, second)
    } else {
        (second_result, first_result, first)
    };
    won?;
    assert!(matches!(
        lost,
        Err(JobError::Storage(StorageError::Conflict(_)))
    ));
    assert_eq!(store.inner.snapshot().await.node_count(), 1);

    importer
        .import_from_reader(RdfFormat::NTriples, lost_data.as_bytes())
        .await?;
    let prefixes = store
        .inner
        .load_namespaces()
        .await?
        .into_iter()
        .map(|(prefix, namespace)| (namespace, prefix))
        .collect::<BTreeMap<_, _>>();
    assert_eq!(prefixes.len(), 2);
    let snapshot = store.inner.snapshot().await;
    for (uri, namespace, local_name) in [
        ("http://a.example/x", "http://a.example/", "p"),
        ("http://b.example/y", "http://b.example/", "q"),
    ] {
        let key = format!("{}__{local_name}", prefixes[namespace]);
        let node = snapshot.find_by_uri(uri).unwrap();
        assert!(node.property(&key).is_some(), "{uri} has no property {key}");
    }
    Ok(())
}

/// A store that yields to the runtime before every access, so that concurrent jobs interleave.
struct YieldingStore {
    inner: MemGraphStore,
}

#[async_trait]
impl GraphStore for YieldingStore {
    async fn begin(&self) -> Result<Box<dyn GraphTransaction>, StorageError> {
        tokio::task::yield_now().await;
        self.inner.begin().await
    }
}

#[async_trait]
impl MappingStore for YieldingStore {
    async fn load_namespaces(&self) -> Result<Vec<(String, String)>, StorageError> {
        tokio::task::yield_now().await;
        self.inner.load_namespaces().await
    }

    async fn save_namespaces(&self, definitions: &[(String, String)]) -> Result<(), StorageError> {
        tokio::task::yield_now().await;
        self.inner.save_namespaces(definitions).await
    }

    async fn load_vocabulary_mappings(&self) -> Result<Vec<(String, String)>, StorageError> {
        tokio::task::yield_now().await;
        self.inner.load_vocabulary_mappings().await
    }
}

/// A store whose commits start to fail after a given number of successful ones.
struct FailingStore {
    inner: MemGraphStore,
    successful_commits: Arc<AtomicUsize>,
}

impl FailingStore {
    fn new(successful_commits: usize) -> Self {
        Self {
            inner: MemGraphStore::new(),
            successful_commits: Arc::new(AtomicUsize::new(successful_commits)),
        }
    }
}

#[async_trait]
impl GraphStore for FailingStore {
    async fn begin(&self) -> Result<Box<dyn GraphTransaction>, StorageError> {
        Ok(Box::new(FailingTransaction {
            inner: self.inner.begin().await?,
            successful_commits: Arc::clone(&self.successful_commits),
        }))
    }
}

#[async_trait]
impl MappingStore for FailingStore {
    async fn load_namespaces(&self) -> Result<Vec<(String, String)>, StorageError> {
        self.inner.load_namespaces().await
    }

    async fn save_namespaces(&self, definitions: &[(String, String)]) -> Result<(), StorageError> {
        self.inner.save_namespaces(definitions).await
    }

    async fn load_vocabulary_mappings(&self) -> Result<Vec<(String, String)>, StorageError> {
        self.inner.load_vocabulary_mappings().await
    }
}

struct FailingTransaction {
    inner: Box<dyn GraphTransaction>,
    successful_commits: Arc<AtomicUsize>,
}

#[async_trait]
impl GraphTransaction for FailingTransaction {
    async fn find_node(
        &mut self,
        label: &str,
        key: &str,
        value: &TypedValue,
    ) -> Result<Option<NodeId>, StorageError> {
        self.inner.find_node(label, key, value).await
    }

    async fn merge_node(
        &mut self,
        label: &str,
        key: &str,
        value: &TypedValue,
    ) -> Result<NodeId, StorageError> {
        self.inner.merge_node(label, key, value).await
    }

    async fn labels(&mut self, node: NodeId) -> Result<Vec<String>, StorageError> {
        self.inner.labels(node).await
    }

    async fn add_label(&mut self, node: NodeId, label: &str) -> Result<bool, StorageError> {
        self.inner.add_label(node, label).await
    }

    async fn remove_label(&mut self, node: NodeId, label: &str) -> Result<bool, StorageError> {
        self.inner.remove_label(node, label).await
    }

    async fn property(
        &mut self,
        node: NodeId,
        key: &str,
    ) -> Result<Option<PropertyValue>, StorageError> {
        self.inner.property(node, key).await
    }

    async fn property_keys(&mut self, node: NodeId) -> Result<Vec<String>, StorageError> {
        self.inner.property_keys(node).await
    }

    async fn set_property(
        &mut self,
        node: NodeId,
        key: &str,
        value: PropertyValue,
    ) -> Result<(), StorageError> {
        self.inner.set_property(node, key, value).await
    }

    async fn remove_property(
        &mut self,
        node: NodeId,
        key: &str,
    ) -> Result<Option<PropertyValue>, StorageError> {
        self.inner.remove_property(node, key).await
    }

    async fn merge_relationship(
        &mut self,
        start: NodeId,
        rel_type: &str,
        end: NodeId,
    ) -> Result<RelationshipId, StorageError> {
        self.inner.merge_relationship(start, rel_type, end).await
    }

    async fn relationships(
        &mut self,
        node: NodeId,
        rel_type: Option<&str>,
        direction: Direction,
    ) -> Result<Vec<Relationship>, StorageError> {
        self.inner.relationships(node, rel_type, direction).await
    }

    async fn degree(
        &mut self,
        node: NodeId,
        rel_type: Option<&str>,
        direction: Direction,
    ) -> Result<usize, StorageError> {
        self.inner.degree(node, rel_type, direction).await
    }

    async fn delete_relationship(
        &mut self,
        relationship: RelationshipId,
    ) -> Result<bool, StorageError> {
        self.inner.delete_relationship(relationship).await
    }

    async fn delete_node(&mut self, node: NodeId) -> Result<bool, StorageError> {
        self.inner.delete_node(node).await
    }

    async fn commit(self: Box<Self>) -> Result<(), StorageError> {
        let remaining = self.successful_commits.load(Ordering::SeqCst);
        if remaining == 0 {
            return Err(StorageError::Other("The disk is full".into()));
        }
        self.successful_commits.store(remaining - 1, Ordering::SeqCst);
        self.inner.commit().await
    }
}
