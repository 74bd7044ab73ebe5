//! Declaration builders: turn the token stream of one PHP file into reflection records.
//!
//! The builder walks the significant tokens of a file once. Declarations it understands (namespaces, imports,
//! constants, functions, classes, interfaces and traits) become records; every other statement is skipped to its
//! terminating `;` or closing `}`. Bodies of functions and methods are never interpreted, only scanned for `static`
//! variable declarations.
//!
//! ## Examples
//!
//! ```rust
//! use tokenreflect::builder;
//! use tokenreflect::BrokerConfig;
//! use tokenreflect_syntax::lexer;
//!
//! let tokens = lexer::lex("<?php namespace N; const X = 1; function f($a = X) {}").unwrap();
//! let file = builder::build_file(tokens, "a.php", &BrokerConfig::default()).unwrap();
//! assert_eq!(file.namespaces()[0].name(), "N");
//! assert_eq!(file.namespaces()[0].functions()[0].name(), "N\\f");
//! ```

use std::path::Path;
use std::rc::Rc;

use tokenreflect_core::lang::keywords::{self, KeywordId};
use tokenreflect_core::lang::operators::OperatorId;
use tokenreflect_core::lang::punctuation::{self, PunctuationId};
use tokenreflect_syntax::lexer::{Token, TokenKind};
use tokenreflect_syntax::stream::TokenStream;

use crate::broker::SymbolKind;
use crate::config::BrokerConfig;
use crate::error::ReflectionError;
use crate::names::{self, AliasTable, ImportKind};
use crate::reflection::{
    ClassKind, FileNamespace, FunctionSignature, Location, ReflectionClass, ReflectionConstant, ReflectionFile,
    ReflectionFunction, ReflectionMethod, ReflectionParameter, ReflectionProperty, StaticVariable, TypeHint,
    Visibility,
};
use crate::value::ValueDefinition;
use crate::value::definition::ValueScope;

// NOTE: This module is split across multiple files using `include!` to keep all builder
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("builder/core.rs");
include!("builder/helpers.rs");
include!("builder/file.rs");
include!("builder/class.rs");
include!("builder/function.rs");
include!("builder/constant.rs");
include!("builder/api.rs");
include!("builder/tests.rs");
