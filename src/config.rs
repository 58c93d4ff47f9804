//! Configuration for Stowage
//!
//! CLI arguments and environment variable handling using clap.

use clap::{Parser, Subcommand};

/// Stowage - MongoDB school helpers and an instrumented Redis cache
#[derive(Parser, Debug, Clone)]
#[command(name = "stowage")]
#[command(about = "Document-query helpers and an instrumented key-value cache")]
pub struct Args {
    /// Redis connection URL
    #[arg(long, env = "REDIS_URL", default_value = "redis://127.0.0.1:6379/0")]
    pub redis_url: String,

    /// Flush the whole Redis database when the cache opens (destructive)
    #[arg(long, env = "RESET_ON_OPEN", default_value = "false")]
    pub reset_on_open: bool,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "logs")]
    pub mongodb_db: String,

    /// MongoDB collection holding school documents
    #[arg(long, env = "MONGODB_COLLECTION", default_value = "school")]
    pub mongodb_collection: String,

    /// Use in-process stores instead of Redis/MongoDB
    #[arg(long, env = "IN_MEMORY", default_value = "false")]
    pub in_memory: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Store a text and an integer, read them back, replay `Cache.store`
    CacheDemo {
        /// Print the replay report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// School document helpers
    #[command(subcommand)]
    Schools(SchoolsCommand),
}

#[derive(Subcommand, Debug, Clone)]
pub enum SchoolsCommand {
    /// List every school
    List,

    /// Insert a school from `field=value` pairs
    Insert {
        /// Fields, e.g. `name=UCSF address="505 Parnassus Ave"`
        #[arg(required = true)]
        fields: Vec<String>,
    },

    /// Replace the topics of every school with the given name
    UpdateTopics {
        #[arg(long)]
        name: String,

        /// Topics to set (may be empty)
        topics: Vec<String>,
    },

    /// List schools teaching a topic
    ByTopic { topic: String },
}

impl Args {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.redis_url.trim().is_empty() {
            return Err("REDIS_URL must not be empty".to_string());
        }
        if self.mongodb_db.trim().is_empty() || self.mongodb_collection.trim().is_empty() {
            return Err("MONGODB_DB and MONGODB_COLLECTION must not be empty".to_string());
        }
        if let Command::Schools(SchoolsCommand::Insert { fields }) = &self.command {
            for field in fields {
                parse_field(field)?;
            }
        }
        Ok(())
    }
}

/// Split a `field=value` argument
pub fn parse_field(raw: &str) -> Result<(&str, &str), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value)),
        _ => Err(format!("expected field=value, got '{}'", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["stowage", "cache-demo"]).unwrap();
        assert_eq!(args.redis_url, "redis://127.0.0.1:6379/0");
        assert!(!args.reset_on_open);
        assert!(matches!(args.command, Command::CacheDemo { json: false }));
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_schools_insert_parses() {
        let args = Args::try_parse_from([
            "stowage",
            "--in-memory",
            "schools",
            "insert",
            "name=UCSF",
            "address=505 Parnassus Ave",
        ])
        .unwrap();
        assert!(args.in_memory);
        match &args.command {
            Command::Schools(SchoolsCommand::Insert { fields }) => assert_eq!(fields.len(), 2),
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_invalid_field_rejected() {
        let args =
            Args::try_parse_from(["stowage", "schools", "insert", "no-equals-sign"]).unwrap();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_parse_field() {
        assert_eq!(parse_field("a=b=c").unwrap(), ("a", "b=c"));
        assert_eq!(parse_field("empty=").unwrap(), ("empty", ""));
        assert!(parse_field("=x").is_err());
    }
}
