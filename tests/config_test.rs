mod common;

use common::{init_tracing, schema};
use std::io::Write;
use triplemap::{
    open_repository, ConfigError, Conditions, MapperConfig, PersistenceEngine, QueryLanguage,
    RepositoryOptions,
};

#[test]
fn test_engine_from_config_file() {
    init_tracing();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "repository:\n  storage: memory\n  name: people\nsubject_prefix: p-\ncount_language: sparql11"
    )
    .unwrap();

    let config = MapperConfig::from_file(file.path()).unwrap();
    assert_eq!(config.repository.name.as_deref(), Some("people"));

    let repository = open_repository(&config.repository).unwrap();
    let mut engine = PersistenceEngine::with_config(repository, schema(), config);
    let ada = engine.create("Person", vec![("name", "Ada")]).unwrap();

    assert!(ada.id().unwrap().starts_with("p-"));
    assert_eq!(engine.count("Person", &Conditions::new()).unwrap(), 1);
}

#[test]
fn test_sparql10_repository_cannot_count() {
    init_tracing();
    let config = MapperConfig::from_yaml_str("count_language: sparql10\n").unwrap();
    assert_eq!(config.count_language, QueryLanguage::Sparql10);

    let repository = open_repository(&config.repository).unwrap();
    let mut engine = PersistenceEngine::with_config(repository, schema(), config);
    engine.create("Person", vec![("name", "Ada")]).unwrap();

    // ASK and plain SELECT work in either dialect
    assert!(engine.exists("Person", &Conditions::new()).unwrap());
    assert_eq!(engine.finder("Person").unwrap().to_vec().unwrap().len(), 1);
    assert!(engine.count("Person", &Conditions::new()).is_err());
}

#[test]
fn test_database_yaml_mapping() {
    let options = RepositoryOptions::from_database_yaml(
        "adapter: sqlite3\ndatabase: db/people.sqlite3\npool: 5\n",
    )
    .unwrap();
    assert_eq!(options.storage, "sqlite");
    assert_eq!(options.name.as_deref(), Some("db/people.sqlite3"));
    assert_eq!(options.extra.get("pool"), Some(&serde_json::Value::from(5)));

    assert!(matches!(
        open_repository(&options),
        Err(ConfigError::UnsupportedStorage(storage)) if storage == "sqlite"
    ));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = MapperConfig::from_file(dir.path().join("absent.yml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_yaml_round_trip() {
    let config = MapperConfig::from_yaml_str("subject_prefix: b-\n").unwrap();
    let reparsed = MapperConfig::from_yaml_str(&config.to_yaml_string().unwrap()).unwrap();
    assert_eq!(reparsed.subject_prefix.as_deref(), Some("b-"));
    assert_eq!(reparsed.count_language, config.count_language);
    assert_eq!(reparsed.repository.storage, "memory");
}
