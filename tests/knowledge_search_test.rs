mod helpers;

use engram::repo::QueryOptions;
use helpers::{entity, relation, test_app};

#[test]
fn search_hydrates_matching_entities_with_their_graph() {
    let t = test_app();
    let created = t
        .app
        .create_project_with_entities(
            "P",
            None,
            vec![
                entity("api-gateway", "service", &["listens on 8080"]),
                entity("billing", "service", &[]),
                entity("Alice", "person", &["owns billing"]),
            ],
        )
        .unwrap();
    let pid = created.project.meta.id;
    t.app
        .relations
        .create_relation(&pid, relation("Alice", "billing", "maintains"))
        .unwrap();

    let result = t
        .app
        .search_project_knowledge(&pid, "service", QueryOptions::default())
        .unwrap();

    // Both services match by type; Alice does not
    let mut names: Vec<&str> = result.entities.iter().map(|e| e.name.as_str()).collect();
    names.sort();
    assert_eq!(names, ["api-gateway", "billing"]);
    assert_eq!(result.pagination.total, 2);

    // Observations of matched entities only
    let contents: Vec<&str> = result
        .observations
        .iter()
        .map(|o| o.content.as_str())
        .collect();
    assert_eq!(contents, ["listens on 8080"]);

    // The maintains edge touches billing, so it rides along
    assert_eq!(result.relations.len(), 1);
    assert_eq!(result.relations[0].relation_type, "maintains");
}

#[test]
fn search_supports_anchored_patterns() {
    let t = test_app();
    let created = t
        .app
        .create_project_with_entities(
            "P",
            None,
            vec![
                entity("FooService", "service", &[]),
                entity("MyFooClient", "client", &[]),
            ],
        )
        .unwrap();

    let result = t
        .app
        .search_project_knowledge(&created.project.meta.id, "^Foo", QueryOptions::default())
        .unwrap();
    assert_eq!(result.entities.len(), 1);
    assert_eq!(result.entities[0].name, "FooService");
}

#[test]
fn search_pagination_reflects_the_entity_page_only() {
    let t = test_app();
    let created = t
        .app
        .create_project_with_entities(
            "P",
            None,
            (0..7)
                .map(|i| entity(&format!("svc-{i}"), "service", &["up"]))
                .collect(),
        )
        .unwrap();
    let pid = created.project.meta.id;

    let result = t
        .app
        .search_project_knowledge(&pid, "service", QueryOptions::with_limit(3))
        .unwrap();

    assert_eq!(result.entities.len(), 3);
    assert_eq!(result.pagination.total, 7);
    assert_eq!(result.pagination.total_pages, 3);
    // Observations are hydrated for the page's entities, not paginated
    assert_eq!(result.observations.len(), 3);
}

#[test]
fn search_with_invalid_pattern_fails_cleanly() {
    let t = test_app();
    let created = t
        .app
        .create_project_with_entities("P", None, vec![])
        .unwrap();

    let result = t.app.search_project_knowledge(
        &created.project.meta.id,
        "(unclosed",
        QueryOptions::default(),
    );
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("invalid search pattern"));
}

#[test]
fn read_graph_returns_everything_unpaginated() {
    let t = test_app();
    let created = t
        .app
        .create_project_with_entities(
            "P",
            None,
            (0..60)
                .map(|i| entity(&format!("n{i}"), "node", &["seen"]))
                .collect(),
        )
        .unwrap();

    let graph = t.app.read_graph(&created.project.meta.id).unwrap();
    assert_eq!(graph.entities.len(), 60);
    assert_eq!(graph.observations.len(), 60);
}
