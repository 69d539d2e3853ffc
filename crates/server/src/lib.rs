pub mod config;

pub mod db;

pub mod rest;

pub mod openapi;

pub mod error_convert;

pub mod telemetry;

pub mod health;

pub mod auth;

pub mod storage;

// Estate intake domain modules
pub mod repo;

pub mod completion;

pub mod documents;

pub mod pdf_text;
