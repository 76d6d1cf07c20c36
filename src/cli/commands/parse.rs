//! Reading-list enrichment command.

use std::path::Path;
use tokio::runtime::Runtime;

use crate::catalog::{BookCatalog, EnrichedBook, EnrichmentPipeline, GoodreadsClient};
use crate::error::Result;
use crate::{input, table};

/// Read a CSV reading list, enrich every book and print a Markdown table
pub fn cmd_parse(rt: &Runtime, client: GoodreadsClient, filename: &Path) -> anyhow::Result<()> {
    let pipeline = EnrichmentPipeline::new(client);
    let enriched = rt.block_on(enrich_file(&pipeline, filename))?;

    for line in table::render(&table::default_columns(), &enriched) {
        println!("{}", line);
    }
    Ok(())
}

/// Read the file and run every record through the pipeline
async fn enrich_file<C: BookCatalog>(
    pipeline: &EnrichmentPipeline<C>,
    filename: &Path,
) -> Result<Vec<EnrichedBook>> {
    let books = input::read_file(filename)?;
    if books.is_empty() {
        tracing::warn!("No books found in {:?}", filename);
    }

    Ok(pipeline.enrich_all(books).await?)
}
