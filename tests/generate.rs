//! End-to-end generation over a small schema document.

use pretty_assertions::assert_eq;
use schemabind::prelude::*;

const SCHEMA: &str = r#"{
    "schemas": [{
        "name": "shop",
        "enums": [{
            "name": "user_role",
            "values": [
                {"name": "ADMIN", "const_value": 1},
                {"name": "MEMBER", "const_value": 2}
            ]
        }],
        "tables": [{
            "name": "users",
            "columns": [
                {"name": "id", "type": "int", "is_primary": true, "is_sequence": true},
                {"name": "name", "type": "varchar(64)"},
                {"name": "role", "type": "user_role"},
                {"name": "deleted_at", "type": "timestamp", "nullable": true}
            ],
            "indexes": [
                {"name": "PRIMARY", "func": "user_by_id", "fields": ["id"], "is_unique": true, "is_primary": true}
            ]
        }, {
            "name": "posts",
            "columns": [
                {"name": "id", "type": "int", "is_primary": true, "is_sequence": true},
                {"name": "author_id", "type": "int"},
                {"name": "title", "type": "text"}
            ],
            "indexes": [
                {"name": "posts_author_idx", "func": "posts_by_author", "fields": ["author_id"]}
            ],
            "foreign_keys": [{
                "name": "posts_author_id_fkey",
                "func": "author",
                "fields": ["author_id"],
                "ref_table": "users",
                "ref_fields": ["id"],
                "ref_func": "user_by_id"
            }]
        }],
        "views": [{
            "type": "view",
            "name": "active_users",
            "columns": [
                {"name": "id", "type": "int"},
                {"name": "name", "type": "varchar(64)"}
            ]
        }]
    }]
}"#;

fn mysql() -> Output {
    let set: Set = serde_json::from_str(SCHEMA).unwrap();
    let opts = GenerateOptions {
        dialect: Dialect::MySQL,
        ..GenerateOptions::default()
    };
    generate(&set, opts).unwrap()
}

fn table<'a>(out: &'a Output, file: &str) -> &'a schemabind::binding::TableBinding {
    out.files[file]
        .iter()
        .find_map(|b| match b {
            Binding::Table(t) => Some(t),
            _ => None,
        })
        .unwrap()
}

#[test]
fn test_files_per_unit() {
    let out = mysql();
    assert!(out.is_ok(), "{:?}", out.failures);
    let files: Vec<_> = out.files.keys().map(String::as_str).collect();
    assert_eq!(files, vec!["activeuser.py", "post.py", "user.py", "user_role.py"]);
}

#[test]
fn test_user_table() {
    let out = mysql();
    let users = table(&out, "user.py");
    let defs: Vec<_> = users.fields.iter().map(|f| f.definition.as_str()).collect();
    assert_eq!(
        defs,
        vec![
            "id: int  # id",
            "name: str  # name",
            "role: user_role  # role",
            "deleted_at: Optional[datetime.datetime]  # deleted_at",
        ]
    );
    assert_eq!(users.zeros, "0, \"\", None, None");

    let insert = &users.statements[&Operation::Insert];
    assert_eq!(
        insert.sql(),
        "INSERT INTO users (name, role, deleted_at) VALUES (?, ?, ?)"
    );
    assert_eq!(insert.params.len(), 3);

    assert_eq!(
        users.statements[&Operation::Upsert].sql(),
        "INSERT INTO users (id, name, role, deleted_at) VALUES (?, ?, ?, ?) \
         ON DUPLICATE KEY UPDATE name = VALUES(name), role = VALUES(role), \
         deleted_at = VALUES(deleted_at)"
    );
}

#[test]
fn test_post_index_and_foreign_key() {
    let out = mysql();
    let bindings = &out.files["post.py"];
    let index = bindings
        .iter()
        .find_map(|b| match b {
            Binding::Index(i) => Some(i),
            _ => None,
        })
        .unwrap();
    assert_eq!(
        index.signature,
        "def posts_by_author(cursor: Cursor, author_id: int) -> list[Post]"
    );
    assert_eq!(
        index.statement.sql(),
        "SELECT id, author_id, title FROM posts WHERE author_id = ?"
    );

    let fk = bindings
        .iter()
        .find_map(|b| match b {
            Binding::ForeignKey(f) => Some(f),
            _ => None,
        })
        .unwrap();
    assert_eq!(fk.signature, "def author(self, cursor: Cursor) -> User");
    assert_eq!(fk.call, "user_by_id(cursor, p.author_id)");
}

#[test]
fn test_view_has_no_writes() {
    let out = mysql();
    let view = table(&out, "activeuser.py");
    assert_eq!(view.name, "ActiveUser");
    assert!(view.statements.is_empty());
}

#[test]
fn test_json_document() {
    let out = mysql();
    let doc = serde_json::to_value(&out).unwrap();
    assert_eq!(doc["files"]["user_role.py"][0]["unit"], "enum");
    assert_eq!(doc["files"]["user_role.py"][0]["values"][0]["name"], "admin");
    assert_eq!(doc["files"]["user.py"][0]["unit"], "table");
    assert_eq!(
        doc["files"]["user.py"][0]["statements"]["insert"]["generated_key"],
        "last_insert_id"
    );
    assert!(doc["failures"].as_array().unwrap().is_empty());
}

#[test]
fn test_schema_prefix_and_escaping() {
    let set: Set = serde_json::from_str(SCHEMA).unwrap();
    let opts = GenerateOptions {
        dialect: Dialect::Postgres,
        schema: "shop".into(),
        escape: vec!["table".into()],
        ..GenerateOptions::default()
    };
    let out = generate(&set, opts).unwrap();
    let users = table(&out, "user.py");
    assert_eq!(
        users.statements[&Operation::Delete].sql(),
        r#"DELETE FROM shop."users" WHERE id = $1"#
    );
}
