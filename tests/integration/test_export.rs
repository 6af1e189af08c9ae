//! CSV and stdout serialization of classified papers

use get_papers_list::export::{self, ABSENT};
use get_papers_list::{
    AffiliationClassifier, Author, ClassifiedPaper, NoOracle, PaperId, PaperRecord, PapersError,
    ResultRow,
};

fn record(id: &str, title: &str, authors: Vec<Author>) -> PaperRecord {
    PaperRecord {
        id: PaperId::parse(id).unwrap(),
        title: title.to_string(),
        publication_date: Some("2023-11-02".to_string()),
        authors,
    }
}

async fn classified_fixture() -> Vec<ClassifiedPaper> {
    let classifier = AffiliationClassifier::with_oracle(Box::new(NoOracle));
    let records = vec![
        record(
            "100",
            "Antibodies; \"next-gen\", and more",
            vec![
                Author::new("Ana Ortiz")
                    .with_affiliation("Regeneron Pharmaceuticals, Tarrytown, NY. ana.ortiz@regeneron.com")
                    .with_email("ana.ortiz@regeneron.com"),
                Author::new("Ben Ito")
                    .with_affiliation("Takeda Pharmaceutical Co., Ltd., Osaka, Japan"),
                Author::new("Cy Dunn").with_affiliation("Yale University, New Haven, CT"),
            ],
        ),
        record(
            "200",
            "Purely academic",
            vec![Author::new("Di Fox").with_affiliation("University of Toronto")],
        ),
        record(
            "300",
            "No email anywhere",
            vec![Author::new("Ed Hall").with_affiliation("Amgen Inc., Thousand Oaks, CA")],
        ),
    ];
    classifier.classify_all(records).await
}

#[tokio::test]
async fn test_csv_round_trip() {
    let papers = classified_fixture().await;
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("papers.csv");

    export::serialize(&papers, Some(output.as_path())).unwrap();

    let mut reader = csv::Reader::from_path(&output).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
    assert_eq!(headers, export::CSV_HEADERS.to_vec());

    let rows: Vec<ResultRow> = reader.deserialize().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].pubmed_id, "100");
    assert_eq!(rows[0].title, "Antibodies; \"next-gen\", and more");
    assert_eq!(rows[0].author_names(), vec!["Ana Ortiz", "Ben Ito"]);
    assert_eq!(
        rows[0].company_list(),
        vec!["Regeneron Pharmaceuticals", "Takeda Pharmaceutical Co"]
    );
    assert_eq!(rows[0].corresponding_email, "ana.ortiz@regeneron.com");

    assert_eq!(rows[1].pubmed_id, "300");
    assert_eq!(rows[1].corresponding_email, ABSENT);
}

#[tokio::test]
async fn test_csv_overwrites_existing_file() {
    let papers = classified_fixture().await;
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("papers.csv");
    std::fs::write(&output, "stale content\nmore stale content\nand more\nand more\n").unwrap();

    export::serialize(&papers, Some(output.as_path())).unwrap();

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(!text.contains("stale"));
    assert_eq!(text.lines().count(), 3);
}

#[tokio::test]
async fn test_unwritable_destination_is_output_error() {
    let papers = classified_fixture().await;
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("missing").join("nested").join("papers.csv");

    let err = export::serialize(&papers, Some(output.as_path())).unwrap_err();

    match &err {
        PapersError::OutputError { path, .. } => assert_eq!(path, &output),
        other => panic!("Expected OutputError, got {:?}", other),
    }
    assert!(!err.is_network_error());
    assert!(err.to_string().contains("papers.csv"));
}

#[tokio::test]
async fn test_stdout_rendering() {
    let papers = classified_fixture().await;

    let text = export::render_text(&papers);
    assert!(text.contains("[1] PubmedID: 100"));
    assert!(text.contains("[2] PubmedID: 300"));
    assert!(text.contains("Non-academic Author(s): Ana Ortiz; Ben Ito"));
    assert!(!text.contains("Purely academic"));
    assert!(text.contains("2 paper(s) with company-affiliated authors"));

    export::serialize(&papers, None).expect("stdout is writable");
}

#[tokio::test]
async fn test_stdout_no_results_message() {
    let papers = classified_fixture().await;
    let discarded: Vec<ClassifiedPaper> = papers.into_iter().filter(|p| !p.is_kept()).collect();

    assert_eq!(export::render_text(&discarded), "No results found.\n");
    assert!(export::to_rows(&discarded).is_empty());
}
