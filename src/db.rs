// Catalog storage: CSV source files and the SQLite product table.
// The SQLite table mirrors the remote `img_metadata` collection.

use crate::error::Result;
use crate::product::{Product, ProductRow};
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;

/// Rows that survived validation plus the number that did not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    pub products: Vec<Product>,
    pub rejected: usize,
}

impl Batch {
    fn accept(&mut self, row: ProductRow, source: &str) {
        let id = row.id.clone();
        match Product::try_from(row) {
            Ok(product) => self.products.push(product),
            Err(e) => {
                tracing::warn!(source, id = %id, error = %e, "rejecting malformed product row");
                self.rejected += 1;
            }
        }
    }
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS img_metadata (
            row_id INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT UNIQUE NOT NULL,
            nombre_perfume TEXT NOT NULL,
            marca_perfume TEXT NOT NULL,
            precio_perfume REAL,
            presentacion_perfume TEXT NOT NULL,
            ocasion_perfume TEXT NOT NULL,
            clima_perfume TEXT NOT NULL,
            hora_dia_perfume TEXT NOT NULL,
            genero_perfume TEXT NOT NULL,
            tipo_perfume TEXT NOT NULL,
            cloudinary_url TEXT,
            added_date TEXT,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_tipo ON img_metadata(tipo_perfume)",
        [],
    )?;

    Ok(())
}

/// Reads a CSV whose header uses the wire field names. Malformed rows are
/// skipped and counted; an unreadable file is an error.
pub fn load_csv(csv_path: &Path) -> Result<Batch> {
    let mut rdr = csv::Reader::from_path(csv_path)?;
    let mut batch = Batch::default();

    for result in rdr.deserialize::<ProductRow>() {
        match result {
            Ok(row) => batch.accept(row, "csv"),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable CSV row");
                batch.rejected += 1;
            }
        }
    }

    Ok(batch)
}

/// Inserts products, skipping ids that already exist. Returns `(inserted, duplicates)`.
pub fn insert_products(conn: &Connection, products: &[Product]) -> Result<(usize, usize)> {
    let mut inserted = 0;
    let mut duplicates = 0;

    for p in products {
        let result = conn.execute(
            "INSERT INTO img_metadata (
                id, nombre_perfume, marca_perfume, precio_perfume,
                presentacion_perfume, ocasion_perfume, clima_perfume,
                hora_dia_perfume, genero_perfume, tipo_perfume,
                cloudinary_url, added_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                p.id,
                p.name,
                p.brand,
                p.price,
                p.presentation,
                p.occasion,
                p.climate,
                p.time_of_day,
                p.gender,
                p.perfume_type.as_str(),
                p.image_url,
                p.added_date,
            ],
        );

        match result {
            Ok(_) => inserted += 1,
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                duplicates += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!(inserted, duplicates, "import finished");
    Ok((inserted, duplicates))
}

/// Opens an existing catalog database without creating one.
pub fn open_read_only(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    Ok(conn)
}

pub fn get_all_products(conn: &Connection) -> Result<Batch> {
    let mut stmt = conn.prepare(
        "SELECT id, nombre_perfume, marca_perfume, precio_perfume,
                presentacion_perfume, ocasion_perfume, clima_perfume,
                hora_dia_perfume, genero_perfume, tipo_perfume,
                cloudinary_url, added_date
         FROM img_metadata
         ORDER BY row_id",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(ProductRow {
                id: row.get(0)?,
                name: row.get(1)?,
                brand: row.get(2)?,
                price: row.get(3)?,
                presentation: row.get(4)?,
                occasion: row.get(5)?,
                climate: row.get(6)?,
                time_of_day: row.get(7)?,
                gender: row.get(8)?,
                perfume_type: row.get(9)?,
                image_url: row.get::<_, Option<String>>(10)?.unwrap_or_default(),
                added_date: row.get::<_, Option<String>>(11)?.unwrap_or_default(),
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut batch = Batch::default();
    for row in rows {
        batch.accept(row, "sqlite");
    }

    Ok(batch)
}

pub fn verify_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM img_metadata", [], |row| row.get(0))?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::sample_products;
    use std::io::Write;

    const HEADER: &str = "id,nombrePerfume,marcaPerfume,precioPerfume,presentacionPerfume,ocasionPerfume,climaPerfume,horaDiaPerfume,generoPerfume,tipoPerfume,imageUrl,addedDate,stock";

    fn write_csv(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[test]
    fn test_load_csv_skips_malformed_rows() {
        let file = write_csv(&[
            "10,Velvet Musk,Casa Nova,140,100ml,formal,frio,noche,unisex,nicho,,2024-04-01,3",
            "11,Mystery,Unknown,90,50ml,casual,calido,dia,mujer,celebrity,,2024-04-02,1",
            "12,Sea Salt,Costa,,75ml,casual,calido,dia,hombre,disenador,/sea.jpg,2024-04-03,0",
        ]);

        let batch = load_csv(file.path()).unwrap();
        assert_eq!(batch.products.len(), 2);
        assert_eq!(batch.rejected, 1);
        assert_eq!(batch.products[0].name, "Velvet Musk");
        assert_eq!(batch.products[1].price, 0.0);
    }

    #[test]
    fn test_negative_zero_price_ties_with_zero() {
        let file = write_csv(&[
            "a,Zero,Casa,0,50ml,casual,calido,dia,unisex,nicho,,2024-04-01,1",
            "b,NegZero,Casa,-0,50ml,casual,calido,dia,unisex,nicho,,2024-04-01,1",
        ]);

        let batch = load_csv(file.path()).unwrap();
        assert_eq!(batch.rejected, 0);

        let sorted = crate::sort::order(&batch.products, crate::sort::SortKey::PriceAsc);
        let ids: Vec<&str> = sorted.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_load_csv_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_csv(&dir.path().join("missing.csv")).is_err());
    }

    #[test]
    fn test_import_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let conn = Connection::open(dir.path().join("catalog.db")).unwrap();
        setup_database(&conn).unwrap();

        let products = sample_products();
        let (inserted, duplicates) = insert_products(&conn, &products).unwrap();
        assert_eq!(inserted, 8);
        assert_eq!(duplicates, 0);

        let batch = get_all_products(&conn).unwrap();
        assert_eq!(batch.rejected, 0);
        assert_eq!(batch.products, products);
    }

    #[test]
    fn test_import_twice_skips_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let conn = Connection::open(dir.path().join("catalog.db")).unwrap();
        setup_database(&conn).unwrap();

        let products = sample_products();
        insert_products(&conn, &products).unwrap();
        let (inserted, duplicates) = insert_products(&conn, &products).unwrap();

        assert_eq!(inserted, 0);
        assert_eq!(duplicates, 8);
        assert_eq!(verify_count(&conn).unwrap(), 8);
    }

    #[test]
    fn test_open_read_only_does_not_create() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");
        assert!(open_read_only(&path).is_err());
        assert!(!path.exists());
    }
}
