mod common;

use std::sync::Arc;

use tablink_core::config::SearchConfig;
use tablink_core::pipeline::resolve;
use tablink_core::table::Table;
use tablink_core::{ColumnMatcher, RankingEngine, TableAnnotation, TaskKind};

use common::{context, doc, FakeBackend};

fn search_config() -> SearchConfig {
    SearchConfig::default()
}

#[tokio::test]
async fn test_two_pass_matching_refines_profiled_columns() {
    let ctx = context();
    let search = search_config();
    let backend = FakeBackend::new()
        .with_hits("Paris", vec![doc("dbr:Paris", "Paris", &["dbc:Capitals"], &["dbo:City"], 1.0)])
        .with_hits("Lyon", vec![doc("dbr:Lyon", "Lyon", &[], &["dbo:City"], 1.0)]);

    let table = Table::new(
        "cities",
        vec![
            vec!["City".into()],
            vec!["Paris".into()],
            vec!["Lyon".into()],
        ],
    );
    let rows = table.keywords(&[1, 2], &[0]);

    let matcher = ColumnMatcher::new(&backend, &ctx, &search);
    let output = matcher.match_rows(&rows, &search.index, &[]).await.unwrap();

    // Two first-pass searches plus two refined searches.
    assert_eq!(backend.searches(), 4);
    // Paris: one category and one type signal per pass; Lyon: one type per pass.
    assert_eq!(output.signals.len(), 6);
    assert!(output.relations.contains_key("dbr:Paris"));
    assert!(output.relations.contains_key("dbr:Lyon"));
}

#[tokio::test]
async fn test_ignored_types_produce_no_signals() {
    let ctx = context();
    let search = search_config();
    let backend = FakeBackend::new().with_hits(
        "Berlin",
        vec![doc(
            "dbr:Berlin",
            "Berlin",
            &[],
            &["http://dbpedia.org/ontology/Location", "dbo:City"],
            1.0,
        )],
    );

    let table = Table::new("t", vec![vec!["Name".into()], vec!["Berlin".into()]]);
    let rows = table.keywords(&[1], &[0]);

    let matcher = ColumnMatcher::new(&backend, &ctx, &search);
    let output = matcher.match_rows(&rows, &search.index, &[]).await.unwrap();

    assert!(output.signals.iter().all(|s| s.facet.uri() == "dbo:City"));
    assert_eq!(output.signals[0].facet.idf(), 0.0);
}

#[tokio::test]
async fn test_ranking_prefers_exact_label() {
    let ctx = context().shared();
    let search = search_config();
    let backend = FakeBackend::new().with_hits(
        "Paris",
        vec![
            doc("dbr:Paris_Hilton", "Paris Hilton", &["dbc:Socialites"], &["dbo:Person"], 1.0),
            doc("dbr:Paris", "Paris", &["dbc:Capitals"], &["dbo:City"], 0.9),
        ],
    );

    let table = Table::new("t", vec![vec!["City".into()], vec!["Paris".into()]]);
    let rows = table.keywords(&[1], &[0]);
    let output = ColumnMatcher::new(&backend, &ctx, &search)
        .match_rows(&rows, &search.index, &[])
        .await
        .unwrap();

    let winners = RankingEngine::new(Arc::clone(&ctx)).rank(&output.signals, TaskKind::CellEntity);
    assert_eq!(winners.len(), 1);
    assert_eq!(winners[0].entity_uri, "dbr:Paris");
    assert!((0.0..=1.0).contains(&winners[0].final_score));
}

#[tokio::test]
async fn test_resolve_column_pair() {
    let ctx = context().shared();
    let search = search_config();

    let mut paris = doc("dbr:Paris", "Paris", &[], &["dbo:City"], 1.0);
    paris.objects = vec![
        ("dbo:mayor".into(), vec!["dbr:Anne_Hidalgo".into()]),
        ("dbo:country".into(), vec!["dbr:France".into()]),
    ];
    let backend = FakeBackend::new()
        .with_hits("Paris", vec![paris])
        .with_hits("France", vec![doc("dbr:France", "France", &[], &["dbo:Country"], 1.0)]);

    let table = Table::new(
        "t",
        vec![
            vec!["City".into(), "Country".into()],
            vec!["Paris".into(), "France".into()],
        ],
    );
    let matcher = ColumnMatcher::new(&backend, &ctx, &search);
    let head = matcher
        .match_rows(&table.keywords(&[1], &[0]), &search.index, &[])
        .await
        .unwrap();
    let tail = matcher
        .match_rows(&table.keywords(&[1], &[1]), &search.tail_index, &[])
        .await
        .unwrap();

    match resolve(ctx, TaskKind::ColumnPair, head, Some(tail)) {
        TableAnnotation::Relations(edges) => {
            assert_eq!(edges.len(), 1);
            assert_eq!(edges[0].head_column, 0);
            assert_eq!(edges[0].tail_column, 1);
            assert_eq!(edges[0].relation_uri, "dbo:country");
            assert_eq!(edges[0].support_count, 1);
        }
        other => panic!("unexpected annotation: {:?}", other),
    }
}

#[tokio::test]
async fn test_no_hits_resolve_to_nothing() {
    let ctx = context().shared();
    let search = search_config();
    let backend = FakeBackend::new();

    let table = Table::new("t", vec![vec!["Word".into()], vec!["Qwzx".into()]]);
    let output = ColumnMatcher::new(&backend, &ctx, &search)
        .match_rows(&table.keywords(&[1], &[0]), &search.index, &[])
        .await
        .unwrap();

    assert!(output.signals.is_empty());
    for task in [TaskKind::CellEntity, TaskKind::ColumnType, TaskKind::ColumnPair] {
        assert!(resolve(Arc::clone(&ctx), task, output.clone(), None).is_empty());
    }
}

#[tokio::test]
async fn test_table_hint_seeds_related_entities() {
    let ctx = context();
    let search = search_config();
    let mut list = doc("dbr:List_of_capitals", "List of capitals", &[], &[], 1.0);
    list.objects = vec![("dbo:wikiPageWikiLink".into(), vec!["dbr:Paris".into()])];
    let backend = FakeBackend::new().with_hits("List of capitals", vec![list]);

    let matcher = ColumnMatcher::new(&backend, &ctx, &search);
    assert_eq!(
        matcher.table_hint("List_of_capitals#1").await.unwrap(),
        vec!["dbr:Paris".to_string()]
    );
    assert!(matcher.table_hint("1234_5678").await.unwrap().is_empty());
    assert_eq!(backend.searches(), 1);
}
