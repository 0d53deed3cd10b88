//! Embedding-dimension guard.
//!
//! The dimension the database was created with is recorded in the meta
//! table. Starting with a model that produces a different length needs an
//! explicit opt-in, because vectors of different lengths never participate
//! in the same similarity computation: old entries stay stored but drop out
//! of retrieval until re-inserted under the new model.

use std::io::{self, Write};

use crate::db::traits::DatabaseBackend;
use crate::embeddings::Embedder;
use crate::error::Result;

pub enum MigrationDecision {
    NotNeeded,
    Approved,
    Rejected,
}

pub async fn check_dimension_compatibility(
    db: &dyn DatabaseBackend,
    embedder: &dyn Embedder,
    accept_change: bool,
) -> Result<MigrationDecision> {
    let model_dims = embedder.dimensions();

    let Some(stored_dims) = db.get_embedding_dimensions().await? else {
        db.set_embedding_dimensions(model_dims).await?;
        tracing::info!(dimensions = model_dims, "fresh database, dimension recorded");
        return Ok(MigrationDecision::NotNeeded);
    };

    if stored_dims == model_dims {
        return Ok(MigrationDecision::NotNeeded);
    }

    tracing::warn!(
        stored = stored_dims,
        model = model_dims,
        "embedding dimension mismatch"
    );

    if accept_change {
        return Ok(MigrationDecision::Approved);
    }

    if confirm_interactively(stored_dims, model_dims)? {
        Ok(MigrationDecision::Approved)
    } else {
        Ok(MigrationDecision::Rejected)
    }
}

fn confirm_interactively(stored_dims: usize, model_dims: usize) -> Result<bool> {
    print!(
        "\nEmbedding dimension mismatch detected!\n\
         Database: {stored_dims} dimensions\n\
         Model: {model_dims} dimensions\n\n\
         Existing entries will stay stored but will be excluded from\n\
         similarity retrieval until re-inserted under the new model.\n\
         Proceed? [y/N]: "
    );
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Record the new dimension after an approved change. Old vectors are left
/// in place; the retrieval scan's length check keeps them out of results.
pub async fn accept_dimension_change(db: &dyn DatabaseBackend, new_dims: usize) -> Result<()> {
    db.set_embedding_dimensions(new_dims).await?;
    tracing::info!(
        dimensions = new_dims,
        "embedding dimension updated, pre-existing vectors are retrieval-excluded"
    );
    Ok(())
}
