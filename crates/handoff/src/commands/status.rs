use handoff_state::{FileStateStore, Paths, StateStore};

pub fn run(session: Option<&str>) -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let store = FileStateStore::new(paths.state_dir());
    println!("{}", status_json(&store, session));
    Ok(())
}

fn status_json(store: &FileStateStore, session: Option<&str>) -> serde_json::Value {
    let mut output = serde_json::json!({
        "state_dir": store.dir().display().to_string(),
        "records": store.count(),
    });

    if let Some(sid) = session {
        output["session"] = serde_json::json!(store.load(sid));
    }

    output
}
