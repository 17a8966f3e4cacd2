use lcconfig::Config;

// Binaire de test séparé : les variables d'environnement sont globales au processus
#[test]
fn test_env_override() {
    std::env::set_var("LITECOMICS_CONFIG__HOST__PAGE_LIST_CACHE__SIZE", "12");
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();
    assert_eq!(
        config.get_value(&["host", "page_list_cache", "size"]).unwrap().as_u64().unwrap(),
        12
    );
    std::env::remove_var("LITECOMICS_CONFIG__HOST__PAGE_LIST_CACHE__SIZE");
}
