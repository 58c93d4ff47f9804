//! Stowage - demo binary for the school helpers and the instrumented cache

use bson::{Bson, Document};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stowage::{
    cache::{Cache, CacheOptions, Instrumentation},
    config::{parse_field, Args, Command, SchoolsCommand},
    db::{self, DocumentCollection, MemoryCollection, MongoClient},
    instrument,
    kv::{KeyValueStore, MemoryStore, RedisStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("stowage={},warn", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    match &args.command {
        Command::CacheDemo { json } => cache_demo(&args, *json).await,
        Command::Schools(cmd) => schools(&args, cmd).await,
    }
}

async fn open_kv(args: &Args) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    if args.in_memory {
        info!("Using in-process key-value store");
        return Ok(Arc::new(MemoryStore::new()));
    }
    Ok(Arc::new(RedisStore::connect(&args.redis_url).await?))
}

async fn open_collection(args: &Args) -> anyhow::Result<Box<dyn DocumentCollection>> {
    if args.in_memory {
        info!("Using in-process document collection");
        return Ok(Box::new(MemoryCollection::new()));
    }
    let client = MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await?;
    Ok(Box::new(client.collection(&args.mongodb_collection)))
}

async fn cache_demo(args: &Args, json: bool) -> anyhow::Result<()> {
    let cache = Cache::open(
        open_kv(args).await?,
        CacheOptions {
            reset_on_open: args.reset_on_open,
            instrumentation: Instrumentation::default(),
        },
    )
    .await?;

    let text_key = cache.store("Hello, Redis!").await?;
    let int_key = cache.store(1234).await?;

    println!("{}", cache.get_str(&text_key).await?);
    println!("{}", cache.get_int(&int_key).await?);

    let method = cache.store_method().clone();
    if json {
        let report = cache.history(&method).await?;
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        instrument::replay(&cache, method).await?;
    }
    Ok(())
}

async fn schools(args: &Args, cmd: &SchoolsCommand) -> anyhow::Result<()> {
    let collection = open_collection(args).await?;
    let collection = collection.as_ref();

    match cmd {
        SchoolsCommand::List => print_documents(db::list_all(Some(collection)).await?)?,
        SchoolsCommand::Insert { fields } => {
            let mut document = Document::new();
            for raw in fields {
                let (name, value) = parse_field(raw).map_err(anyhow::Error::msg)?;
                document.insert(name, field_value(value));
            }
            let id = db::insert_school(collection, document).await?;
            println!("{}", id);
        }
        SchoolsCommand::UpdateTopics { name, topics } => {
            let summary = db::update_topics(collection, name, topics.as_slice()).await?;
            info!(
                matched = summary.matched,
                modified = summary.modified,
                "topics updated"
            );
        }
        SchoolsCommand::ByTopic { topic } => {
            print_documents(db::schools_by_topic(collection, topic).await?)?
        }
    }
    Ok(())
}

/// Interpret a CLI field value as the narrowest BSON scalar it parses as
fn field_value(raw: &str) -> Bson {
    if let Ok(i) = raw.parse::<i64>() {
        return Bson::Int64(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Bson::Double(f);
    }
    match raw {
        "true" => Bson::Boolean(true),
        "false" => Bson::Boolean(false),
        _ => Bson::String(raw.to_string()),
    }
}

fn print_documents(documents: Vec<Document>) -> anyhow::Result<()> {
    for document in documents {
        let json = Bson::Document(document).into_relaxed_extjson();
        println!("{}", serde_json::to_string(&json)?);
    }
    Ok(())
}
