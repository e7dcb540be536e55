//! WeCloud Storefront - lifetime cloud-storage plans
//!
//! Sells storage plans through a hosted payment gateway and, once a payment is
//! verified, creates the customer's account in the organization's directory.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
