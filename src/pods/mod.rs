// src/pods/mod.rs
mod lister;

pub use lister::{project_selector, KubePodApi, PodApi, PodError, PodLister};
