mod common;
mod ingest;
