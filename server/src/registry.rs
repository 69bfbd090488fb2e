use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::actor::{TableActor, TableHandle};
use holdem_engine::TableConfig;

/// Maps table ids to their actor handles. The mutex only ever guards
/// insert/remove on the map itself; once a handle is cloned out, all
/// further traffic to that table goes straight to its actor's channel,
/// never back through this lock (spec §5, "short-critical-section mutex").
#[derive(Clone, Default)]
pub struct Registry {
    tables: Arc<Mutex<HashMap<String, TableHandle>>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    pub async fn create_table(&self, config: TableConfig) -> String {
        let id = Uuid::new_v4().to_string();
        let handle = TableActor::spawn(id.clone(), config);
        self.tables.lock().await.insert(id.clone(), handle);
        id
    }

    pub async fn get(&self, table_id: &str) -> Option<TableHandle> {
        self.tables.lock().await.get(table_id).cloned()
    }

    pub async fn remove(&self, table_id: &str) -> Option<TableHandle> {
        self.tables.lock().await.remove(table_id)
    }
}
