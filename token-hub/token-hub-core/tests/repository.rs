//! Repository behaviour against both store implementations.

use tempfile::TempDir;
use token_hub_core::{
    CsvStore, ErrorKind, MemoryStore, Row, RowStore, StoreError, TokenRecord, TokenRepository,
};

fn token(project: &str, token: &str) -> TokenRecord {
    TokenRecord {
        project_name: project.into(),
        token: token.into(),
        permission: "read".into(),
        user_id: "1".into(),
        user_name: "Bob".into(),
        expiry_date: "2024/6/30".into(),
    }
}

fn header() -> Row {
    ["Project Name", "Token", "Permission", "User ID", "User Name", "Expiry Date"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn tokens(records: &[TokenRecord]) -> Vec<&str> {
    records.iter().map(|r| r.token.as_str()).collect()
}

fn csv_repo(dir: &TempDir, records: &[TokenRecord]) -> TokenRepository {
    let store = CsvStore::new(dir.path().join("uploaded.csv"));
    let rows: Vec<Row> = records.iter().map(TokenRecord::to_row).collect();
    store.write_all(&rows).unwrap();
    TokenRepository::new(store)
}

#[test]
fn append_to_single_row_store() {
    let dir = TempDir::new().unwrap();
    let first = TokenRecord {
        project_name: "Project A".into(),
        token: "t1".into(),
        permission: "read".into(),
        user_id: "1".into(),
        user_name: "Bob".into(),
        expiry_date: "2024/6/30".into(),
    };
    let second = TokenRecord {
        project_name: "Project B".into(),
        token: "t2".into(),
        permission: "write".into(),
        user_id: "2".into(),
        user_name: "Amy".into(),
        expiry_date: "2024/7/1".into(),
    };
    let repo = csv_repo(&dir, &[first.clone()]);

    repo.append(second.clone()).unwrap();

    assert_eq!(repo.list_all().unwrap(), vec![first, second]);
}

#[test]
fn append_preserves_prior_rows() {
    let dir = TempDir::new().unwrap();
    let repo = csv_repo(&dir, &[token("P", "a"), token("Q", "b")]);
    repo.append(token("R", "r")).unwrap();
    assert_eq!(tokens(&repo.list_all().unwrap()), vec!["a", "b", "r"]);
}

#[test]
fn append_does_not_create_missing_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("uploaded.csv");
    let repo = TokenRepository::new(CsvStore::new(&path));
    let err = repo.append(token("P", "a")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(!path.exists());
}

#[test]
fn list_on_missing_store_is_not_found() {
    let repo = TokenRepository::new(MemoryStore::absent());
    assert_eq!(repo.list_all().unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(
        repo.list_by_project("P").unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn list_all_includes_header_and_skips_malformed_rows() {
    let store = MemoryStore::with_rows(vec![
        header(),
        token("P", "a").into_row(),
        vec!["broken".to_string()],
        token("Q", "b").into_row(),
    ]);
    let repo = TokenRepository::new(store);
    let records = repo.list_all().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].project_name, "Project Name");
    assert_eq!(tokens(&records[1..]), vec!["a", "b"]);
}

#[test]
fn list_all_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let repo = csv_repo(&dir, &[token("P", "a"), token("Q", "b")]);
    assert_eq!(repo.list_all().unwrap(), repo.list_all().unwrap());
}

#[test]
fn list_by_project_filters_exactly() {
    let dir = TempDir::new().unwrap();
    let repo = csv_repo(
        &dir,
        &[
            token("P", "a"),
            token("Q", "b"),
            token("p", "c"),
            token("P", "d"),
            token("P ", "e"),
        ],
    );
    assert_eq!(tokens(&repo.list_by_project("P").unwrap()), vec!["a", "d"]);
    assert!(repo.list_by_project("Z").unwrap().is_empty());
    assert_eq!(tokens(&repo.list(Some("Q")).unwrap()), vec!["b"]);
    assert_eq!(repo.list(None).unwrap().len(), 5);
}

#[test]
fn replace_project_moves_group_to_tail() {
    let dir = TempDir::new().unwrap();
    let repo = csv_repo(&dir, &[token("P", "p1"), token("Q", "q1"), token("P", "p2")]);

    repo.replace_project("P", vec![token("P", "new")]).unwrap();

    let records = repo.list_all().unwrap();
    assert_eq!(tokens(&records), vec!["q1", "new"]);
    assert_eq!(records[1].project_name, "P");
}

#[test]
fn replace_project_keeps_other_rows_in_order() {
    let store = MemoryStore::with_rows(vec![
        header(),
        token("Q", "q1").into_row(),
        token("P", "p1").into_row(),
        vec!["R".to_string(), "odd".to_string()],
        token("S", "s1").into_row(),
    ]);
    let repo = TokenRepository::new(store);

    repo.replace_project("P", vec![token("P", "n1"), token("P", "n2")])
        .unwrap();

    let rows = repo.store().snapshot().unwrap();
    let firsts: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(firsts, vec!["Project Name", "Q", "R", "S", "P", "P"]);
    assert_eq!(rows[4][1], "n1");
    assert_eq!(rows[5][1], "n2");
}

#[test]
fn replace_project_with_empty_set_removes_group() {
    let dir = TempDir::new().unwrap();
    let repo = csv_repo(&dir, &[token("P", "a"), token("Q", "b")]);
    repo.replace_project("P", Vec::new()).unwrap();
    assert_eq!(tokens(&repo.list_all().unwrap()), vec!["b"]);
}

#[test]
fn delete_rejects_out_of_range_indices() {
    let dir = TempDir::new().unwrap();
    let repo = csv_repo(&dir, &[token("P", "a"), token("Q", "b")]);
    assert_eq!(repo.delete_at(-1).unwrap_err().kind(), ErrorKind::OutOfRange);
    assert_eq!(repo.delete_at(2).unwrap_err().kind(), ErrorKind::OutOfRange);
    assert_eq!(tokens(&repo.list_all().unwrap()), vec!["a", "b"]);
}

#[test]
fn delete_removes_exactly_one_row() {
    let dir = TempDir::new().unwrap();
    let repo = csv_repo(&dir, &[token("P", "a"), token("Q", "b"), token("R", "c")]);

    let removed = repo.delete_at(1).unwrap();

    assert_eq!(removed, token("Q", "b").into_row());
    assert_eq!(tokens(&repo.list_all().unwrap()), vec!["a", "c"]);
    repo.delete_at(1).unwrap();
    assert_eq!(tokens(&repo.list_all().unwrap()), vec!["a"]);
}

#[test]
fn delete_counts_header_row() {
    let store = MemoryStore::with_rows(vec![
        header(),
        token("Project A", "token456").into_row(),
        token("Project B", "token456").into_row(),
        token("Project D", "token444").into_row(),
    ]);
    let repo = TokenRepository::new(store);

    repo.delete_at(2).unwrap();

    let projects: Vec<String> = repo
        .list_all()
        .unwrap()
        .into_iter()
        .map(|r| r.project_name)
        .collect();
    assert_eq!(projects, vec!["Project Name", "Project A", "Project D"]);
}

#[test]
fn delete_on_missing_store_is_not_found() {
    let repo = TokenRepository::new(MemoryStore::absent());
    assert_eq!(repo.delete_at(0).unwrap_err().kind(), ErrorKind::NotFound);
}

#[test]
fn error_reports_operation_and_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.csv");
    let repo = TokenRepository::new(CsvStore::new(&path));
    let err = repo.list_all().unwrap_err();
    assert_eq!(err.to_string(), "list all tokens failed");
    let cause = std::error::Error::source(&err).unwrap().to_string();
    assert!(cause.contains("missing.csv"));
}

#[test]
fn out_of_range_names_backing_file() {
    let dir = TempDir::new().unwrap();
    let repo = csv_repo(&dir, &[token("P", "a")]);
    let err = repo.delete_at(5).unwrap_err();
    match &err.source {
        StoreError::OutOfRange { path, index, len } => {
            assert_eq!(path, &dir.path().join("uploaded.csv"));
            assert_eq!((*index, *len), (5, 1));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn mutations_refuse_malformed_quoting() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("uploaded.csv");
    let broken = "P,\"t1,read,1,Bob,2024/6/30\nQ,t2,read,2,Amy,2024/7/1\n";
    std::fs::write(&path, broken).unwrap();
    let repo = TokenRepository::new(CsvStore::new(&path));

    assert_eq!(
        repo.append(token("R", "r")).unwrap_err().kind(),
        ErrorKind::Read
    );
    assert_eq!(
        repo.replace_project("Q", Vec::new()).unwrap_err().kind(),
        ErrorKind::Read
    );
    assert_eq!(repo.delete_at(0).unwrap_err().kind(), ErrorKind::Read);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), broken);
}
