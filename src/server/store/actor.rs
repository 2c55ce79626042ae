//! `StateStore` actor.
//!
//! The actor's mailbox is the serialization point of the store: each message is
//! one atomic single-key operation against the backend.

use actix::prelude::*;
use log::debug;

use super::StoreError;
use super::backend::KvBackend;

pub struct StateStore {
    backend: Box<dyn KvBackend>,
}

impl StateStore {
    pub fn new(backend: Box<dyn KvBackend>) -> Self {
        Self { backend }
    }
}

impl Actor for StateStore {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        debug!("[Store] State store started");
    }
}

#[derive(Message)]
#[rtype(result = "Result<Option<String>, StoreError>")]
pub struct Get {
    pub key: String,
}

#[derive(Message)]
#[rtype(result = "Result<(), StoreError>")]
pub struct Set {
    pub key: String,
    pub value: String,
}

#[derive(Message)]
#[rtype(result = "Result<(), StoreError>")]
pub struct Delete {
    pub key: String,
}

/// Write `new` only if the key currently holds `expected`. Answers whether it did.
#[derive(Message)]
#[rtype(result = "Result<bool, StoreError>")]
pub struct CompareAndSet {
    pub key: String,
    pub expected: Option<String>,
    pub new: Option<String>,
}

impl Handler<Get> for StateStore {
    type Result = Result<Option<String>, StoreError>;

    fn handle(&mut self, msg: Get, _: &mut Context<Self>) -> Self::Result {
        self.backend.get(&msg.key)
    }
}

impl Handler<Set> for StateStore {
    type Result = Result<(), StoreError>;

    fn handle(&mut self, msg: Set, _: &mut Context<Self>) -> Self::Result {
        self.backend.set(&msg.key, msg.value)
    }
}

impl Handler<Delete> for StateStore {
    type Result = Result<(), StoreError>;

    fn handle(&mut self, msg: Delete, _: &mut Context<Self>) -> Self::Result {
        self.backend.delete(&msg.key)
    }
}

impl Handler<CompareAndSet> for StateStore {
    type Result = Result<bool, StoreError>;

    fn handle(&mut self, msg: CompareAndSet, _: &mut Context<Self>) -> Self::Result {
        self.backend
            .compare_and_set(&msg.key, msg.expected.as_deref(), msg.new)
    }
}
