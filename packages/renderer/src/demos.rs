//! Interactive demos.
//!
//! A `demo` block names its demo by string. The renderer looks the name up
//! through a [`DemoProvider`] handed to it; [`DemoRegistry`] is the default
//! provider.

use crate::vdom::VNode;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Demo names known to the client bundle
pub const BUILTIN_DEMOS: [&str; 4] = ["bubbleSort", "imageSurface", "convolution", "dfa"];

/// Props handed to a demo: `{ imageSrc?, ...args }` on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoProps {
    /// Resolved source of the demo's image, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_src: Option<String>,
    #[serde(flatten)]
    pub args: Map<String, Value>,
}

impl DemoProps {
    /// Block args win over the resolved image: a string `imageSrc` arg
    /// replaces it.
    pub fn new(image_src: Option<String>, mut args: Map<String, Value>) -> Self {
        let image_src = match args.remove("imageSrc") {
            Some(Value::String(src)) => Some(src),
            Some(other) => {
                args.insert("imageSrc".to_string(), other);
                image_src
            }
            None => image_src,
        };
        Self { image_src, args }
    }
}

#[derive(Error, Debug)]
pub enum DemoError {
    #[error("Demo needs an image but none is available")]
    MissingImage,

    #[error("Invalid demo argument '{name}': {message}")]
    InvalidArg { name: String, message: String },

    #[error("Failed to encode demo props: {0}")]
    Props(#[from] serde_json::Error),

    #[error("{0}")]
    Failed(String),
}

pub trait Demo {
    fn render(&self, props: &DemoProps) -> Result<VNode, DemoError>;
}

impl<F> Demo for F
where
    F: Fn(&DemoProps) -> Result<VNode, DemoError>,
{
    fn render(&self, props: &DemoProps) -> Result<VNode, DemoError> {
        self(props)
    }
}

pub trait DemoProvider {
    fn resolve(&self, name: &str) -> Option<&dyn Demo>;
}

/// Client hydration target: the page script mounts the named demo here.
#[derive(Debug, Clone)]
pub struct MountPoint {
    name: String,
}

impl MountPoint {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Demo for MountPoint {
    fn render(&self, props: &DemoProps) -> Result<VNode, DemoError> {
        let encoded = serde_json::to_string(props)?;
        Ok(VNode::element("div")
            .with_attr("class", "demo")
            .with_attr("data-demo", self.name.as_str())
            .with_attr("data-props", encoded))
    }
}

#[derive(Default)]
pub struct DemoRegistry {
    demos: BTreeMap<String, Box<dyn Demo>>,
}

impl DemoRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with a mount point for each name
    pub fn with_mount_points<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        for name in names {
            let name = name.into();
            registry.register(name.clone(), MountPoint::new(name));
        }
        registry
    }

    /// Mount points for [`BUILTIN_DEMOS`]
    pub fn builtin() -> Self {
        Self::with_mount_points(BUILTIN_DEMOS)
    }

    pub fn register(&mut self, name: impl Into<String>, demo: impl Demo + 'static) {
        self.demos.insert(name.into(), Box::new(demo));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.demos.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.demos.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.demos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.demos.is_empty()
    }
}

impl DemoProvider for DemoRegistry {
    fn resolve(&self, name: &str) -> Option<&dyn Demo> {
        self.demos.get(name).map(|demo| demo.as_ref())
    }
}

impl fmt::Debug for DemoRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.demos.keys()).finish()
    }
}
