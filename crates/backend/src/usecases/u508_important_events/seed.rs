use super::repository;
use sea_orm::ConnectionTrait;

/// Initial questionnaire: (plural category key, units)
pub const DEFAULT_UNITS: &[(&str, &[(i64, &str)])] = &[
    (
        "eventEntities",
        &[
            (1, "Moved to a new home"),
            (2, "Started or changed a job"),
            (3, "Lost a job"),
            (4, "Marriage or new partnership"),
            (5, "Separation or divorce"),
            (6, "Birth or adoption of a child"),
            (7, "Death of a close person"),
            (8, "Serious illness or injury"),
            (9, "None of the above"),
        ],
    ),
    (
        "areaEntities",
        &[
            (1, "Family"),
            (2, "Work or studies"),
            (3, "Health"),
            (4, "Finances"),
            (5, "Friendships"),
            (6, "No area was affected"),
        ],
    ),
    (
        "impactEntities",
        &[
            (1, "Not at all"),
            (2, "Slightly"),
            (3, "Moderately"),
            (4, "Strongly"),
        ],
    ),
];

/// Заполняет каталог при первом запуске; существующий каталог не трогаем
pub async fn seed_catalog_if_empty<C: ConnectionTrait>(conn: &C) -> anyhow::Result<usize> {
    if repository::count_units(conn).await? > 0 {
        return Ok(0);
    }

    let mut inserted = 0;
    for (plural_name, units) in DEFAULT_UNITS {
        for (sort_order, (id, description)) in units.iter().enumerate() {
            repository::insert_unit(conn, plural_name, *id, description, sort_order as i32)
                .await?;
            inserted += 1;
        }
    }
    tracing::info!("Seeded important events catalog with {} units", inserted);
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::usecases::u508_important_events::EntityNameMap;

    #[test]
    fn test_default_units_are_mapped() {
        let map = EntityNameMap::standard();
        for (plural_name, units) in DEFAULT_UNITS {
            assert!(map.by_plural(plural_name).is_some(), "{plural_name}");
            assert!(!units.is_empty());
        }
    }
}
