use super::ImageExporter;
use crate::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Clone)]
pub struct MockImageExporter {
    exported: Arc<Mutex<Vec<String>>>,
    base_path: PathBuf,
    should_fail: Arc<Mutex<bool>>,
}

impl MockImageExporter {
    pub fn new() -> Self {
        Self {
            exported: Arc::new(Mutex::new(Vec::new())),
            base_path: PathBuf::from("/tmp"),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn with_base_path(mut self, path: PathBuf) -> Self {
        self.base_path = path;
        self
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_export_count(&self) -> usize {
        self.exported.lock().unwrap().len()
    }

    /// Data-URLs handed to the exporter, in call order.
    pub fn exported(&self) -> Vec<String> {
        self.exported.lock().unwrap().clone()
    }
}

impl Default for MockImageExporter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageExporter for MockImageExporter {
    async fn export_image(&self, data_url: &str, base_name: &str) -> Result<PathBuf> {
        if *self.should_fail.lock().unwrap() {
            return Err(crate::Error::Io(std::io::Error::other("Mock failure")));
        }

        self.exported.lock().unwrap().push(data_url.to_string());

        Ok(self
            .base_path
            .join(format!("{}_{}.png", base_name, Uuid::new_v4())))
    }
}
