//! Dialect-specific statements (MySQL, SQLite, SQL Server, Oracle).

use pretty_assertions::assert_eq;

use crate::model::fixtures::*;
use crate::schema::ProcKind;
use crate::synth::*;

fn synth(dialect: Dialect) -> Synthesizer {
    Synthesizer::new(dialect, "", Escape::default())
}

fn sql(dialect: Dialect, op: Operation, target: Target<'_>) -> String {
    synth(dialect).synthesize(op, target).unwrap().sql()
}

#[test]
fn test_placeholders() {
    let users = users();
    assert_eq!(
        sql(Dialect::MySQL, Operation::Update, Target::Table(&users)),
        "UPDATE users SET name = ?, email = ? WHERE id = ?"
    );
    assert_eq!(
        sql(Dialect::SqlServer, Operation::Update, Target::Table(&users)),
        "UPDATE users SET name = @p1, email = @p2 WHERE id = @p3"
    );
    assert_eq!(
        sql(Dialect::Oracle(OracleType::Ora), Operation::Update, Target::Table(&users)),
        "UPDATE users SET name = :1, email = :2 WHERE id = :3"
    );
}

#[test]
fn test_mysql_dialect() {
    let users = users();
    let stmt = synth(Dialect::MySQL)
        .synthesize(Operation::Insert, Target::Table(&users))
        .unwrap();
    assert_eq!(stmt.sql(), "INSERT INTO users (name, email) VALUES (?, ?)");
    assert_eq!(stmt.generated_key, GeneratedKey::LastInsertId);

    assert_eq!(
        sql(Dialect::MySQL, Operation::Upsert, Target::Table(&users)),
        "INSERT INTO users (id, name, email) VALUES (?, ?, ?) \
         ON DUPLICATE KEY UPDATE name = VALUES(name), email = VALUES(email)"
    );

    let s = Synthesizer::new(Dialect::MySQL, "shop", Escape::all());
    assert_eq!(
        s.synthesize(Operation::Delete, Target::Table(&users)).unwrap().sql(),
        "DELETE FROM `shop`.`users` WHERE `id` = ?"
    );
}

#[test]
fn test_sqlite_dialect() {
    let users = users();
    assert_eq!(
        sql(Dialect::SQLite, Operation::Upsert, Target::Table(&users)),
        "INSERT INTO users (id, name, email) VALUES (?, ?, ?) \
         ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, email = EXCLUDED.email"
    );

    // no schema prefix even when one is configured
    let s = Synthesizer::new(Dialect::SQLite, "main", Escape::all());
    assert_eq!(
        s.synthesize(Operation::Delete, Target::Table(&users)).unwrap().sql(),
        r#"DELETE FROM "users" WHERE "id" = ?"#
    );

    let proc = add_user(ProcKind::Procedure);
    let err = synth(Dialect::SQLite)
        .synthesize(Operation::CallProc, Target::Proc(&proc))
        .unwrap_err();
    assert_eq!(err.to_string(), "Unsupported stored procedures for sqlite");
}

#[test]
fn test_sqlserver_dialect() {
    let users = users();
    let stmt = synth(Dialect::SqlServer)
        .synthesize(Operation::Insert, Target::Table(&users))
        .unwrap();
    assert_eq!(
        stmt.sql(),
        "INSERT INTO users (name, email) VALUES (@p1, @p2); \
         SELECT ID = CONVERT(BIGINT, SCOPE_IDENTITY())"
    );
    assert_eq!(stmt.generated_key, GeneratedKey::Selected);

    let s = Synthesizer::new(Dialect::SqlServer, "dbo", Escape::parse(&["table"]).unwrap());
    assert_eq!(
        s.synthesize(Operation::Delete, Target::Table(&users)).unwrap().sql(),
        "DELETE FROM dbo.[users] WHERE id = @p1"
    );
}

#[test]
fn test_sqlserver_merge() {
    let users = users();
    assert_eq!(
        sql(Dialect::SqlServer, Operation::Upsert, Target::Table(&users)),
        "MERGE users AS t USING (SELECT @p1 id, @p2 name, @p3 email) AS s \
         ON s.id = t.id \
         WHEN MATCHED THEN UPDATE SET t.name = s.name, t.email = s.email \
         WHEN NOT MATCHED THEN INSERT (name, email) VALUES (s.name, s.email);"
    );
}

#[test]
fn test_merge_without_updates() {
    let tags = tags();
    assert_eq!(
        sql(Dialect::SqlServer, Operation::Upsert, Target::Table(&tags)),
        "MERGE tags AS t USING (SELECT @p1 tag) AS s ON s.tag = t.tag \
         WHEN NOT MATCHED THEN INSERT (tag) VALUES (s.tag);"
    );
}

#[test]
fn test_oracle_merge() {
    let items = order_items();
    assert_eq!(
        sql(Dialect::Oracle(OracleType::Ora), Operation::Upsert, Target::Table(&items)),
        "MERGE INTO order_items t \
         USING (SELECT :1 order_id, :2 line, :3 sku, :4 qty FROM DUAL) s \
         ON (s.order_id = t.order_id AND s.line = t.line) \
         WHEN MATCHED THEN UPDATE SET t.sku = s.sku, t.qty = s.qty \
         WHEN NOT MATCHED THEN INSERT (order_id, line, sku, qty) \
         VALUES (s.order_id, s.line, s.sku, s.qty)"
    );
}

#[test]
fn test_oracle_returning_into() {
    let users = users();
    let stmt = synth(Dialect::Oracle(OracleType::Ora))
        .synthesize(Operation::Insert, Target::Table(&users))
        .unwrap();
    assert_eq!(
        stmt.sql(),
        "INSERT INTO users (name, email) VALUES (:1, :2) RETURNING id INTO :3"
    );
    assert_eq!(stmt.generated_key, GeneratedKey::OutParam);
    assert_eq!(stmt.params.len(), 3);
    assert_eq!(stmt.inputs().count(), 2);
    let out = &stmt.params[2];
    assert_eq!(out.slot, Slot::Positional(2));
    assert_eq!(out.direction, Direction::Out);
}

#[test]
fn test_godror_returning_into() {
    let users = users();
    let stmt = synth(Dialect::Oracle(OracleType::Godror))
        .synthesize(Operation::Insert, Target::Table(&users))
        .unwrap();
    assert_eq!(
        stmt.sql(),
        "INSERT INTO users (name, email) VALUES (:1, :2) RETURNING id /*LASTINSERTID*/ INTO :pk"
    );
    assert_eq!(stmt.params[2].slot, Slot::Named("pk".into()));
}

#[test]
fn test_procedure_calls() {
    let proc = add_user(ProcKind::Procedure);
    let target = Target::Proc(&proc);
    assert_eq!(sql(Dialect::Postgres, Operation::CallProc, target), "CALL add_user($1, $2)");
    assert_eq!(sql(Dialect::MySQL, Operation::CallProc, target), "CALL add_user(?, ?)");
    assert_eq!(sql(Dialect::SqlServer, Operation::CallProc, target), "add_user");

    let stmt = synth(Dialect::Oracle(OracleType::Ora))
        .synthesize(Operation::CallProc, target)
        .unwrap();
    assert_eq!(stmt.sql(), "BEGIN add_user(:name, :email, :id); END;");
    let dirs: Vec<_> = stmt.params.iter().map(|p| p.direction).collect();
    assert_eq!(dirs, vec![Direction::In, Direction::In, Direction::Out]);
}

#[test]
fn test_function_calls() {
    let func = add_user(ProcKind::Function);
    let target = Target::Proc(&func);
    assert_eq!(
        sql(Dialect::Postgres, Operation::CallProc, target),
        "SELECT * FROM add_user($1, $2)"
    );
    assert_eq!(sql(Dialect::MySQL, Operation::CallProc, target), "SELECT add_user(?, ?)");
    assert_eq!(
        sql(Dialect::SqlServer, Operation::CallProc, target),
        "SELECT add_user(@p1, @p2) AS OUT"
    );
    assert_eq!(
        sql(Dialect::Oracle(OracleType::Ora), Operation::CallProc, target),
        "SELECT add_user(:1, :2) FROM dual"
    );
}

#[test]
fn test_call_uses_schema() {
    let func = add_user(ProcKind::Function);
    let s = Synthesizer::new(Dialect::Postgres, "app", Escape::default());
    assert_eq!(
        s.synthesize(Operation::CallProc, Target::Proc(&func)).unwrap().sql(),
        "SELECT * FROM app.add_user($1, $2)"
    );
}
