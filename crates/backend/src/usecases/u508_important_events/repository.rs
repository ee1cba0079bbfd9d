use chrono::{DateTime, Utc};
use contracts::usecases::u508_important_events::{CodeNumber, ImportantEventsData};
use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement, TransactionTrait,
};

/// Строка каталога из `u508_entity_unit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitRow {
    pub plural_name: String,
    pub id: i64,
    pub description: String,
}

/// Все элементы каталога в порядке отображения
pub async fn list_units<C: ConnectionTrait>(conn: &C) -> anyhow::Result<Vec<UnitRow>> {
    let rows = conn
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            r#"
            SELECT plural_name, id, description
            FROM u508_entity_unit
            ORDER BY plural_name, sort_order, id
            "#
            .to_string(),
        ))
        .await?;

    rows.into_iter()
        .map(|row| -> anyhow::Result<UnitRow> {
            Ok(UnitRow {
                plural_name: row.try_get("", "plural_name")?,
                id: row.try_get("", "id")?,
                description: row.try_get("", "description")?,
            })
        })
        .collect()
}

pub async fn count_units<C: ConnectionTrait>(conn: &C) -> anyhow::Result<i64> {
    let row = conn
        .query_one(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT COUNT(*) AS cnt FROM u508_entity_unit".to_string(),
        ))
        .await?;
    match row {
        Some(row) => Ok(row.try_get("", "cnt")?),
        None => Ok(0),
    }
}

pub async fn insert_unit<C: ConnectionTrait>(
    conn: &C,
    plural_name: &str,
    id: i64,
    description: &str,
    sort_order: i32,
) -> anyhow::Result<()> {
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        r#"
        INSERT INTO u508_entity_unit (plural_name, id, description, sort_order)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(plural_name, id) DO UPDATE SET
            description = excluded.description,
            sort_order = excluded.sort_order
        "#,
        vec![
            plural_name.into(),
            id.into(),
            description.into(),
            sort_order.into(),
        ],
    ))
    .await?;
    Ok(())
}

/// Saved selections for a code number, `None` if it never submitted
pub async fn load_answers<C: ConnectionTrait>(
    conn: &C,
    code_number: &CodeNumber,
) -> anyhow::Result<Option<ImportantEventsData>> {
    let rows = conn
        .query_all(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            r#"
            SELECT entity_name, unit_id
            FROM u508_answer
            WHERE code_number = ?
            ORDER BY entity_name, unit_id
            "#,
            vec![code_number.as_str().into()],
        ))
        .await?;

    if rows.is_empty() {
        return Ok(None);
    }

    let mut data = ImportantEventsData::new(code_number.clone());
    for row in rows {
        let entity_name: String = row.try_get("", "entity_name")?;
        let unit_id: i64 = row.try_get("", "unit_id")?;
        data.form_data_by_entity_name
            .entry(entity_name)
            .or_default()
            .push(unit_id);
    }
    Ok(Some(data))
}

/// Заменяет все сохранённые ответы `data.code_number` в одной транзакции
pub async fn replace_answers(
    conn: &DatabaseConnection,
    data: &ImportantEventsData,
    saved_at: DateTime<Utc>,
) -> anyhow::Result<()> {
    let txn = conn.begin().await?;

    txn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "DELETE FROM u508_answer WHERE code_number = ?",
        vec![data.code_number.as_str().into()],
    ))
    .await?;

    let updated_at = saved_at.to_rfc3339();
    for (entity_name, ids) in &data.form_data_by_entity_name {
        for id in ids {
            txn.execute(Statement::from_sql_and_values(
                DatabaseBackend::Sqlite,
                r#"
                INSERT INTO u508_answer (code_number, entity_name, unit_id, updated_at)
                VALUES (?, ?, ?, ?)
                "#,
                vec![
                    data.code_number.as_str().into(),
                    entity_name.as_str().into(),
                    (*id).into(),
                    updated_at.as_str().into(),
                ],
            ))
            .await?;
        }
    }

    txn.commit().await?;
    Ok(())
}
