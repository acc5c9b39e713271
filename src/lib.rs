//! Ticketflow - AI-Assisted Support Ticket Helpdesk
//!
//! This crate implements a credit-gated helpdesk backend: users file
//! tickets, a background pipeline summarizes and triages them to
//! moderators, and a payment gateway tops up ticket credits.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
