#![forbid(unsafe_code)]
//! Static reflection of PHP source code.
//!
//! `tokenreflect` extracts namespaces, classes, interfaces, traits, functions, methods, properties, constants and
//! parameters straight from a token stream, without executing or loading the code, and exposes them through an API
//! shaped like a live reflection API.
//!
//! The pieces:
//! - [`builder`] walks the tokens of one file and builds its declaration records.
//! - [`names`] resolves names as written into fully-qualified names.
//! - [`value`] classifies value definitions and evaluates them lazily.
//! - [`Broker`] registers declarations by name and coordinates every lookup and lazy evaluation.
//!
//! ## Panic Policy
//!
//! Library code returns `Result` and propagates with `?`. `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! ## Examples
//! ```rust
//! use tokenreflect::{Broker, FunctionLike, Value};
//!
//! let source = r#"<?php
//! namespace App;
//!
//! use Vendor\Base as Model;
//!
//! class User extends Model
//! {
//!     const ROLE = 'user';
//!
//!     public function rename(string $name, bool $notify = false) {}
//! }
//! "#;
//!
//! let mut broker = Broker::new();
//! broker.process_source(source, "src/User.php").unwrap();
//!
//! let user = broker.get_class("App\\User").unwrap();
//! assert_eq!(user.parent_class_name(), Some("Vendor\\Base"));
//! assert_eq!(user.constant_value("ROLE", &broker).unwrap(), &Value::String("user".into()));
//!
//! let rename = user.own_method("rename").unwrap();
//! assert_eq!(rename.number_of_required_parameters(), 1);
//! ```

pub mod broker;
pub mod builder;
pub mod config;
pub mod error;
pub mod names;
pub mod reflection;
pub mod value;

pub use broker::{Broker, Declaration, SymbolKind};
pub use config::BrokerConfig;
pub use error::ReflectionError;
pub use reflection::{
    ClassKind, FileNamespace, FunctionLike, ReflectionClass, ReflectionConstant, ReflectionFile, ReflectionFunction,
    ReflectionMethod, ReflectionNamespace, ReflectionParameter, ReflectionProperty, TypeHint, Visibility,
};
pub use value::{ArrayKey, Value};

pub use tokenreflect_syntax::lexer;
