//! In memory stand in for discord, used by the unit tests.

use crate::api::ChannelApi;
use crate::errors::Result;
use crate::structs::ReactionTask;

use async_trait::async_trait;
use secrecy::Secret;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub(crate) struct FakeApi {
    latest: Mutex<VecDeque<Result<Option<String>>>>,
    scripted: Mutex<HashMap<String, VecDeque<Result<()>>>>,
    reactions: Mutex<Vec<ReactionTask>>,
    panic_on: Mutex<Option<String>>,
    fetches: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> FakeApi {
        FakeApi::default()
    }

    /// Queue up the next answer to a latest message fetch. Once the queue
    /// runs dry the channel looks empty.
    pub fn push_latest(&self, outcome: Result<Option<String>>) {
        self.latest.lock().unwrap().push_back(outcome);
    }

    pub fn push_message(&self, id: &str) {
        self.push_latest(Ok(Some(id.to_string())));
    }

    /// Queue up the answer for the next reaction with this emoji, unscripted
    /// reactions succeed.
    pub fn script_reaction(&self, emoji: &str, outcome: Result<()>) {
        self.scripted
            .lock()
            .unwrap()
            .entry(emoji.to_string())
            .or_default()
            .push_back(outcome);
    }

    /// Make every reaction with this emoji panic mid call
    pub fn panic_on(&self, emoji: &str) {
        *self.panic_on.lock().unwrap() = Some(emoji.to_string());
    }

    pub fn reactions(&self) -> Vec<ReactionTask> {
        self.reactions.lock().unwrap().clone()
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChannelApi for FakeApi {
    async fn latest_message_id(
        &self,
        _credential: &Secret<String>,
        _channel_id: &str,
    ) -> Result<Option<String>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.latest.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }

    async fn put_reaction(
        &self,
        _credential: &Secret<String>,
        _channel_id: &str,
        message_id: &str,
        emoji: &str,
    ) -> Result<()> {
        self.reactions
            .lock()
            .unwrap()
            .push(ReactionTask::new(message_id, emoji));
        if self.panic_on.lock().unwrap().as_deref() == Some(emoji) {
            panic!("reaction {emoji} blew up");
        }
        self.scripted
            .lock()
            .unwrap()
            .get_mut(emoji)
            .and_then(|queue| queue.pop_front())
            .unwrap_or(Ok(()))
    }
}
