use crate::db::sqlite::SqlitePool;
use crate::error::StockroomError;
use tracing::debug;

/// Append-only (image_id, tag) index.
#[derive(Clone)]
pub struct TagIndex {
    pool: SqlitePool,
}

impl TagIndex {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert one row per tag in a single transaction.
    /// Duplicate tags become duplicate rows; case is stored as given.
    pub async fn add_tagged_image<S: AsRef<str>>(
        &self,
        image_id: &str,
        tags: &[S],
    ) -> Result<(), StockroomError> {
        if tags.is_empty() {
            debug!(image_id, "no tags supplied; nothing stored");
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for tag in tags {
            sqlx::query("INSERT INTO inventory_tags (image_id, tag) VALUES (?, ?)")
                .bind(image_id)
                .bind(tag.as_ref())
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        debug!(image_id, count = tags.len(), "tagged image stored");
        Ok(())
    }

    /// Every image id with at least one tag, each once. Order is unspecified.
    pub async fn list_all_image_ids(&self) -> Result<Vec<String>, StockroomError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT DISTINCT image_id FROM inventory_tags")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Image ids of every row whose tag equals `tag` exactly.
    /// Not deduplicated: an image tagged twice with `tag` appears twice.
    pub async fn list_image_ids_by_tag(&self, tag: &str) -> Result<Vec<String>, StockroomError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT image_id FROM inventory_tags WHERE tag = ? ORDER BY id")
                .bind(tag)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::connect;

    async fn index() -> TagIndex {
        let pool = connect("sqlite::memory:").await.expect("open db");
        TagIndex::new(pool)
    }

    fn sorted(mut v: Vec<String>) -> Vec<String> {
        v.sort();
        v
    }

    #[tokio::test]
    async fn duplicate_tags_are_kept_per_row_but_image_listed_once() {
        let index = index().await;
        index
            .add_tagged_image("img1", &["red", "red"])
            .await
            .expect("insert");

        assert_eq!(
            index.list_image_ids_by_tag("red").await.expect("by tag"),
            vec!["img1", "img1"]
        );
        assert_eq!(index.list_all_image_ids().await.expect("all"), vec!["img1"]);
    }

    #[tokio::test]
    async fn untagged_image_is_invisible() {
        let index = index().await;
        index
            .add_tagged_image::<&str>("img2", &[])
            .await
            .expect("empty insert");

        assert!(index.list_image_ids_by_tag("anytag").await.expect("by tag").is_empty());
        assert!(index.list_all_image_ids().await.expect("all").is_empty());
    }

    #[tokio::test]
    async fn tag_multiplicity_matches_input() {
        let index = index().await;
        let tags = vec![
            "chair".to_string(),
            "wood".to_string(),
            "chair".to_string(),
            "brown".to_string(),
            "chair".to_string(),
        ];
        index.add_tagged_image("img3", &tags).await.expect("insert");
        index.add_tagged_image("img4", &["wood"]).await.expect("insert");

        assert_eq!(index.list_image_ids_by_tag("chair").await.expect("chair").len(), 3);
        assert_eq!(index.list_image_ids_by_tag("brown").await.expect("brown"), vec!["img3"]);
        assert_eq!(
            sorted(index.list_image_ids_by_tag("wood").await.expect("wood")),
            vec!["img3", "img4"]
        );
        assert_eq!(
            sorted(index.list_all_image_ids().await.expect("all")),
            vec!["img3", "img4"]
        );
    }

    #[tokio::test]
    async fn tag_match_is_exact_and_case_sensitive() {
        let index = index().await;
        index
            .add_tagged_image("img5", &["Lamp", "desk lamp"])
            .await
            .expect("insert");

        assert!(index.list_image_ids_by_tag("lamp").await.expect("lamp").is_empty());
        assert_eq!(index.list_image_ids_by_tag("Lamp").await.expect("Lamp"), vec!["img5"]);
        assert_eq!(
            index.list_image_ids_by_tag("desk lamp").await.expect("desk lamp"),
            vec!["img5"]
        );
    }

    #[tokio::test]
    async fn repeated_calls_append_rows() {
        let index = index().await;
        index.add_tagged_image("img6", &["red"]).await.expect("first");
        index.add_tagged_image("img6", &["red"]).await.expect("second");

        assert_eq!(
            index.list_image_ids_by_tag("red").await.expect("red"),
            vec!["img6", "img6"]
        );
        assert_eq!(index.list_all_image_ids().await.expect("all"), vec!["img6"]);
    }
}
