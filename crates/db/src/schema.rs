//! Table definitions and schema (re)creation.
//!
//! Tables are listed parent-first. Creation walks the list forward; reset
//! drops it in reverse with `CASCADE` before recreating.

use sqlx::PgConnection;

/// One table: its name and idempotent `CREATE` statement.
#[derive(Debug, Clone, Copy)]
pub struct TableDef {
    pub name: &'static str,
    pub create_sql: &'static str,
}

pub const USERS: &str = "usertable";
pub const PROJECTS: &str = "projecttable";
pub const IMAGES: &str = "images";
pub const IMAGE_ROIS: &str = "images_roi";
pub const MOSAIC_IMAGES: &str = "mosaic_images";
pub const MOSAIC_MAPS: &str = "mosaic_maps";

/// All tables in foreign-key dependency order.
pub static TABLES: [TableDef; 6] = [
    TableDef {
        name: USERS,
        create_sql: "CREATE TABLE IF NOT EXISTS usertable (
            id SERIAL PRIMARY KEY,
            email TEXT NOT NULL,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL
        )",
    },
    TableDef {
        name: PROJECTS,
        create_sql: "CREATE TABLE IF NOT EXISTS projecttable (
            id SERIAL PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES usertable(id) ON DELETE CASCADE,
            project_name TEXT NOT NULL
        )",
    },
    TableDef {
        name: IMAGES,
        create_sql: "CREATE TABLE IF NOT EXISTS images (
            id SERIAL PRIMARY KEY,
            project_id INTEGER NOT NULL REFERENCES projecttable(id) ON DELETE CASCADE,
            filename TEXT NOT NULL,
            rows INTEGER NOT NULL,
            cols INTEGER NOT NULL,
            comps INTEGER NOT NULL,
            data BYTEA NOT NULL
        )",
    },
    TableDef {
        name: IMAGE_ROIS,
        create_sql: "CREATE TABLE IF NOT EXISTS images_roi (
            id SERIAL PRIMARY KEY,
            project_id INTEGER NOT NULL REFERENCES projecttable(id) ON DELETE CASCADE,
            images_id INTEGER NOT NULL REFERENCES images(id) ON DELETE CASCADE,
            x INTEGER NOT NULL,
            y INTEGER NOT NULL,
            width INTEGER NOT NULL,
            height INTEGER NOT NULL
        )",
    },
    TableDef {
        name: MOSAIC_IMAGES,
        create_sql: "CREATE TABLE IF NOT EXISTS mosaic_images (
            id SERIAL PRIMARY KEY,
            project_id INTEGER NOT NULL UNIQUE REFERENCES projecttable(id) ON DELETE RESTRICT,
            rows INTEGER NOT NULL,
            cols INTEGER NOT NULL,
            comps INTEGER NOT NULL,
            data BYTEA NOT NULL
        )",
    },
    TableDef {
        name: MOSAIC_MAPS,
        create_sql: "CREATE TABLE IF NOT EXISTS mosaic_maps (
            id SERIAL PRIMARY KEY,
            project_id INTEGER NOT NULL UNIQUE REFERENCES projecttable(id) ON DELETE RESTRICT,
            map TEXT NOT NULL
        )",
    },
];

/// Table names in creation order.
pub fn table_names() -> impl DoubleEndedIterator<Item = &'static str> {
    TABLES.iter().map(|t| t.name)
}

/// Drop every table, children first. Missing tables are ignored.
pub async fn drop_tables(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    for name in table_names().rev() {
        sqlx::raw_sql(&format!("DROP TABLE IF EXISTS {name} CASCADE"))
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Create every table that does not yet exist, parents first.
pub async fn create_tables(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    for table in &TABLES {
        sqlx::raw_sql(table.create_sql).execute(&mut *conn).await?;
    }
    Ok(())
}

/// Row count of every table, in creation order.
pub async fn row_counts(conn: &mut PgConnection) -> Result<Vec<(&'static str, i64)>, sqlx::Error> {
    let mut counts = Vec::with_capacity(TABLES.len());
    for name in table_names() {
        let count = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {name}"))
            .fetch_one(&mut *conn)
            .await?;
        counts.push((name, count));
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(name: &str) -> usize {
        table_names().position(|n| n == name).unwrap()
    }

    #[test]
    fn parents_are_created_before_children() {
        assert!(position(USERS) < position(PROJECTS));
        assert!(position(PROJECTS) < position(IMAGES));
        assert!(position(IMAGES) < position(IMAGE_ROIS));
        assert!(position(PROJECTS) < position(MOSAIC_IMAGES));
        assert!(position(PROJECTS) < position(MOSAIC_MAPS));
    }

    #[test]
    fn every_create_statement_targets_its_own_table() {
        for table in &TABLES {
            let prefix = format!("CREATE TABLE IF NOT EXISTS {} (", table.name);
            assert!(table.create_sql.starts_with(&prefix), "{}", table.name);
        }
    }

    #[test]
    fn mosaic_tables_restrict_project_deletion() {
        for table in TABLES.iter().filter(|t| t.name.starts_with("mosaic_")) {
            assert!(table
                .create_sql
                .contains("UNIQUE REFERENCES projecttable(id) ON DELETE RESTRICT"));
        }
    }
}
