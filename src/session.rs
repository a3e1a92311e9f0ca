//! Per-user session state.
//!
//! Each browser session owns its language choice, its translation cache and
//! its assessment progress. Nothing here is shared between sessions.

use crate::assessment::{
    recommend, score, AssessmentData, Likert, Question, Recommendation, RecommendationLimits,
};
use crate::error::AssessmentError;
use crate::i18n::Language;
use crate::translation::TranslationCache;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Assistant,
    User,
}

/// One chat transcript entry, kept in source form so it can be rendered in
/// whatever language the session uses at display time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatMessage {
    Greeting,
    Question(usize),
    Answer(Likert),
    Result(Recommendation),
}

impl ChatMessage {
    pub fn role(&self) -> Role {
        match self {
            ChatMessage::Answer(_) => Role::User,
            _ => Role::Assistant,
        }
    }
}

/// Chat-style assessment: one question at a time, answers appended in order.
#[derive(Debug, Clone, Default)]
pub struct ChatAssessment {
    step: usize,
    answers: Vec<(String, Likert)>,
    transcript: Vec<ChatMessage>,
    result: Option<Recommendation>,
}

impl ChatAssessment {
    pub fn start(data: &AssessmentData) -> Self {
        let mut chat = Self::default();
        chat.restart(data);
        chat
    }

    /// Clear answers, result and transcript and ask the first question again.
    pub fn restart(&mut self, data: &AssessmentData) {
        self.step = 0;
        self.answers.clear();
        self.result = None;
        self.transcript = vec![ChatMessage::Greeting];
        if !data.is_empty() {
            self.transcript.push(ChatMessage::Question(0));
        }
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn result(&self) -> Option<&Recommendation> {
        self.result.as_ref()
    }

    pub fn current_question<'d>(&self, data: &'d AssessmentData) -> Option<(usize, &'d Question)> {
        data.questions().get(self.step).map(|q| (self.step, q))
    }

    pub fn is_complete(&self, data: &AssessmentData) -> bool {
        !data.is_empty() && self.step >= data.questions().len()
    }

    /// Record `answer` for the current question and move on.
    pub fn answer(&mut self, data: &AssessmentData, answer: Likert) -> Result<(), AssessmentError> {
        if data.is_empty() {
            return Err(AssessmentError::NoQuestions);
        }
        let (_, question) = self
            .current_question(data)
            .ok_or(AssessmentError::AlreadyComplete)?;

        self.answers.push((question.category.clone(), answer));
        self.transcript.push(ChatMessage::Answer(answer));
        self.step += 1;

        if self.step < data.questions().len() {
            self.transcript.push(ChatMessage::Question(self.step));
        }
        Ok(())
    }

    /// Compute the recommendation once the last question is answered.
    ///
    /// The result is cached; later calls return it without rescoring.
    pub fn finish(
        &mut self,
        data: &AssessmentData,
        limits: RecommendationLimits,
    ) -> Result<&Recommendation, AssessmentError> {
        if !self.is_complete(data) {
            return Err(AssessmentError::Incomplete {
                answered: self.step,
                total: data.questions().len(),
            });
        }

        let recommendation = match self.result.take() {
            Some(cached) => cached,
            None => {
                let scores = score(
                    data.mapping(),
                    self.answers.iter().map(|(c, a)| (c.as_str(), *a)),
                )?;
                let fresh = recommend(data.mapping(), &scores, limits);
                self.transcript.push(ChatMessage::Result(fresh.clone()));
                fresh
            }
        };

        let result: &Recommendation = self.result.insert(recommendation);
        Ok(result)
    }
}

#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub language: Language,
    pub cache: TranslationCache,
    pub chat: ChatAssessment,
    pub created_at: DateTime<Utc>,
    /// Generation of the assessment document the chat was started against
    assessment_generation: u64,
}

impl Session {
    pub fn new(language: Language, data: &AssessmentData, generation: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            language,
            cache: TranslationCache::new(),
            chat: ChatAssessment::start(data),
            created_at: Utc::now(),
            assessment_generation: generation,
        }
    }

    /// Restart the chat if the assessment document was reloaded since the
    /// chat began. Recorded answers point at the old questions and
    /// categories, so they cannot be carried over.
    ///
    /// Returns `true` when the chat was restarted.
    pub fn sync_assessment(&mut self, data: &AssessmentData, generation: u64) -> bool {
        if self.assessment_generation == generation {
            return false;
        }
        self.assessment_generation = generation;
        self.chat.restart(data);
        true
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

#[derive(Debug)]
struct Entry {
    handle: SessionHandle,
    last_seen: Instant,
}

/// In-memory session registry. Each session sits behind its own lock.
///
/// Sessions idle for longer than the TTL are dropped: lazily on lookup, on
/// every `create`, and by [`SessionStore::evict_expired`].
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn create(&self, language: Language, data: &AssessmentData, generation: u64) -> Uuid {
        let session = Session::new(language, data, generation);
        let id = session.id;

        let mut sessions = self.sessions.write().await;
        let ttl = self.ttl;
        sessions.retain(|_, entry| entry.last_seen.elapsed() < ttl);
        sessions.insert(
            id,
            Entry {
                handle: Arc::new(Mutex::new(session)),
                last_seen: Instant::now(),
            },
        );
        id
    }

    /// Look up a live session and mark it as used.
    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id)?;
        if entry.last_seen.elapsed() >= self.ttl {
            sessions.remove(&id);
            debug!("Session {} expired", id);
            return None;
        }
        entry.last_seen = Instant::now();
        Some(entry.handle.clone())
    }

    /// Drop every expired session, returning how many were removed.
    pub async fn evict_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        let ttl = self.ttl;
        sessions.retain(|_, entry| entry.last_seen.elapsed() < ttl);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
