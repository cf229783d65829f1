//! Shared fixtures for integration tests: a login form, its handler shape,
//! and an instance factory, standing in for what a discovery scan and the
//! embedding application would provide.

use std::sync::Arc;
use std::sync::Mutex;

use route_core::binding::{BindTarget, FieldValue, TargetType};
use route_core::workflow::{InstanceFactory, StoredInstance};

/// Route tracing output through `RUST_LOG` when a test run wants it.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// A form the shell would populate before invoking the login handler.
#[derive(Debug, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub remember_me: bool,
}

impl BindTarget for LoginForm {
    fn property_type(&self, name: &str) -> Option<TargetType> {
        match name {
            "username" | "password" => Some(TargetType::Text),
            "remember_me" => Some(TargetType::Boolean),
            _ => None,
        }
    }

    fn set_property(&mut self, name: &str, value: FieldValue) -> bool {
        match (name, value) {
            ("username", FieldValue::Text(text)) => {
                self.username = text;
                true
            }
            ("password", FieldValue::Text(text)) => {
                self.password = text;
                true
            }
            ("remember_me", FieldValue::Boolean(flag)) => {
                self.remember_me = flag;
                true
            }
            _ => false,
        }
    }
}

/// Creates the sample handler and form instances by their scanned names.
pub struct SampleFactory;

impl InstanceFactory for SampleFactory {
    fn create_handler(&self, type_name: &str) -> Option<StoredInstance> {
        (type_name == "app.LoginHandler").then(|| Arc::new(()) as StoredInstance)
    }

    fn create_form(&self, type_name: &str) -> Option<StoredInstance> {
        (type_name == "app.LoginForm")
            .then(|| Arc::new(Mutex::new(LoginForm::default())) as StoredInstance)
    }
}
