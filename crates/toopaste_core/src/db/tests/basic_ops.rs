//! Basic database CRUD tests.

use super::*;

#[test]
fn paste_create_get_delete_roundtrip() {
    let (db, _temp) = setup_test_db();

    let paste = paste_at("ab12", Visibility::Public, base_time());
    db.pastes.create(&paste).expect("create");

    let retrieved = db
        .pastes
        .get("ab12")
        .expect("get")
        .expect("paste should exist");
    assert_eq!(retrieved, paste);

    assert!(db.pastes.delete("ab12").expect("delete"));
    assert!(db.pastes.get("ab12").expect("get").is_none());
    assert!(db.pastes.is_empty().expect("is_empty"));
}

#[test]
fn paste_create_rejects_duplicate_id_without_overwrite() {
    let (db, _temp) = setup_test_db();

    let original = paste_at("dup1", Visibility::Public, base_time());
    db.pastes.create(&original).expect("create original");

    let mut conflicting = paste_at("dup1", Visibility::Private, base_time());
    conflicting.body = "conflicting".to_string();
    let err = db
        .pastes
        .create(&conflicting)
        .expect_err("duplicate id create must fail");
    assert!(
        matches!(err, AppError::IdConflict(ref id) if id == "dup1"),
        "unexpected duplicate-create error: {}",
        err
    );

    let stored = db.pastes.get("dup1").expect("get").expect("exists");
    assert_eq!(stored.body, original.body);
    assert_eq!(db.pastes.len().expect("len"), 1);
}

#[test]
fn delete_missing_paste_is_a_noop() {
    let (db, _temp) = setup_test_db();
    assert!(!db.pastes.delete("none").expect("delete missing"));
    assert!(db.pastes.delete_and_return("none").expect("delete missing").is_none());
}

#[test]
fn list_public_is_newest_first_and_skips_private() {
    let (db, _temp) = setup_test_db();
    let t0 = base_time();
    db.pastes
        .create(&paste_at("old1", Visibility::Public, t0))
        .unwrap();
    db.pastes
        .create(&paste_at("mid1", Visibility::Public, t0 + Duration::minutes(1)))
        .unwrap();
    db.pastes
        .create(&paste_at("priv", Visibility::Private, t0 + Duration::minutes(2)))
        .unwrap();
    db.pastes
        .create(&paste_at("new1", Visibility::Public, t0 + Duration::minutes(3)))
        .unwrap();

    let listed = db
        .pastes
        .list_public(2, t0 + Duration::hours(1))
        .expect("list");
    let ids: Vec<&str> = listed.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["new1", "mid1"]);

    let all = db
        .pastes
        .list_public(10, t0 + Duration::hours(1))
        .expect("list all");
    assert_eq!(all.len(), 3);
    assert!(all.iter().all(Paste::is_public));
    assert!(db.pastes.list_public(0, t0).expect("list zero").is_empty());
}

#[test]
fn list_public_skips_expired_rows_without_removing_them() {
    let (db, _temp) = setup_test_db();
    let t0 = base_time();
    let mut expiring = paste_at("exp1", Visibility::Public, t0);
    expiring.expires_at = Some(t0 + Duration::minutes(5));
    db.pastes.create(&expiring).unwrap();

    assert_eq!(db.pastes.list_public(10, t0).unwrap().len(), 1);
    assert!(db
        .pastes
        .list_public(10, t0 + Duration::minutes(6))
        .unwrap()
        .is_empty());
    assert!(db.pastes.contains("exp1").unwrap());
}

#[test]
fn delete_if_expired_only_removes_expired_rows() {
    let (db, _temp) = setup_test_db();
    let t0 = base_time();
    let mut expiring = paste_at("exp2", Visibility::Public, t0);
    expiring.expires_at = Some(t0 + Duration::minutes(5));
    db.pastes.create(&expiring).unwrap();

    assert!(!db.pastes.delete_if_expired("exp2", t0).unwrap());
    assert!(db.pastes.contains("exp2").unwrap());
    assert!(db
        .pastes
        .delete_if_expired("exp2", t0 + Duration::minutes(10))
        .unwrap());
    assert!(!db.pastes.contains("exp2").unwrap());
    assert!(!db
        .pastes
        .delete_if_expired("exp2", t0 + Duration::minutes(10))
        .unwrap());
}

#[test]
fn purge_expired_removes_rows_and_index_entries() {
    let (db, _temp) = setup_test_db();
    let t0 = base_time();
    for (id, minutes) in [("p001", Some(1)), ("p002", Some(30)), ("p003", None)] {
        let mut paste = paste_at(id, Visibility::Public, t0);
        paste.expires_at = minutes.map(|m| t0 + Duration::minutes(m));
        db.pastes.create(&paste).unwrap();
    }

    let removed = db.pastes.purge_expired(t0 + Duration::minutes(10)).unwrap();
    assert_eq!(removed, 1);
    assert_eq!(db.pastes.len().unwrap(), 2);
    assert!(!db.pastes.contains("p001").unwrap());

    let listed = db.pastes.list_public(10, t0).unwrap();
    let ids: Vec<&str> = listed.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids.len(), 2);
    assert!(!ids.contains(&"p001"));
}

#[test]
fn reopening_database_preserves_rows() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("persist.db");
    let path = db_path.to_str().unwrap().to_string();
    {
        let db = Database::new(&path).unwrap();
        db.pastes
            .create(&paste_at("keep", Visibility::Private, base_time()))
            .unwrap();
    }
    let db = Database::new(&path).unwrap();
    let stored = db.pastes.get("keep").unwrap().expect("row survives reopen");
    assert_eq!(stored.visibility, Visibility::Private);
}
