//! HTTP handlers. Each request works on one session's state and an
//! immutable snapshot of the loaded data.

use super::dto::{
    AnswerOption, AssessmentResponse, ChatAnswerRequest, ChatMessageView, ChatResponse,
    CreateSessionRequest, FilterOption, FilterOptionsResponse, FinderLabels, FinderQuery,
    FinderResponse, HealthResponse, LanguageRequest, LanguageResponse, PageResponse,
    QuestionView, RecommendationResponse, RecommendationView, SessionResponse, SubjectView,
    SubmitAnswersRequest, UniversityRank, UniversityView,
};
use super::error::ApiError;
use super::{AppState, LoadedData};
use crate::assessment::{recommend, score_answers, Likert, Recommendation};
use crate::catalog::{export_csv, Catalog, SubjectUniversities, EXPORT_FILE_NAME};
use crate::i18n::{Language, LanguageRegistry};
use crate::pages::{self, labels, PageKind};
use crate::security::admin_key_matches;
use crate::session::{ChatAssessment, ChatMessage, Session, SessionHandle};
use crate::translation::Localizer;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{debug, info, warn};
use uuid::Uuid;

const ADMIN_KEY_HEADER: &str = "x-admin-key";

async fn session_handle(state: &AppState, id: Uuid) -> Result<SessionHandle, ApiError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or(ApiError::SessionNotFound)
}

fn parse_language(value: &str) -> Result<Language, ApiError> {
    Language::parse(value).map_err(|e| ApiError::BadRequest(e.to_string()))
}

// ════════════════════════════════════════════════════════════════════════════
// Service
// ════════════════════════════════════════════════════════════════════════════

fn health_report(state: &AppState, data: &LoadedData, sessions: usize) -> HealthResponse {
    let load_errors = data.load_errors();
    HealthResponse {
        status: if load_errors.is_empty() { "ok" } else { "degraded" },
        universities: data.catalog.len(),
        questions: data.assessment.questions().len(),
        categories: data.assessment.mapping().len(),
        sessions,
        load_errors,
        translation: state.translator.metrics().report(),
    }
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let data = state.snapshot();
    let sessions = state.sessions.len().await;
    Json(health_report(&state, &data, sessions))
}

/// GET /api/languages
pub async fn list_languages() -> Json<Vec<LanguageResponse>> {
    let languages = LanguageRegistry::get()
        .list_enabled()
        .into_iter()
        .map(|config| LanguageResponse {
            code: config.code,
            name: config.name,
            native_name: config.native_name,
            canonical: config.is_canonical,
        })
        .collect();
    Json(languages)
}

/// POST /admin/reload - re-read the dataset and assessment document
pub async fn reload_data(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<HealthResponse>, ApiError> {
    let presented = headers
        .get(ADMIN_KEY_HEADER)
        .and_then(|value| value.to_str().ok());
    if !admin_key_matches(state.config.admin_api_key.as_deref(), presented) {
        warn!("Rejected data reload: invalid or missing admin key");
        return Err(ApiError::Unauthorized);
    }

    let config = state.config.clone();
    let loaded = tokio::task::spawn_blocking(move || LoadedData::load(&config))
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Reload task failed: {}", e)))?;
    state.replace_data(loaded);
    info!("Reloaded university dataset and assessment document");

    let data = state.snapshot();
    let sessions = state.sessions.len().await;
    Ok(Json(health_report(&state, &data, sessions)))
}

// ════════════════════════════════════════════════════════════════════════════
// Sessions and static pages
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/sessions
pub async fn create_session(
    State(state): State<AppState>,
    body: Option<Json<CreateSessionRequest>>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let language = match request.language.as_deref() {
        Some(value) => parse_language(value)?,
        None => Language::canonical(),
    };

    let data = state.snapshot();
    let id = state
        .sessions
        .create(language, &data.assessment, data.generation)
        .await;
    let handle = session_handle(&state, id).await?;
    let session = handle.lock().await;
    info!("Created session {} ({})", id, language.code());

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            id,
            language: session.language,
            created_at: session.created_at,
        }),
    ))
}

/// PUT /api/sessions/:id/language
pub async fn set_language(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<LanguageRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let language = parse_language(&request.language)?;
    let handle = session_handle(&state, id).await?;
    let mut session = handle.lock().await;
    session.language = language;
    debug!("Session {} switched to {}", id, language.code());

    Ok(Json(SessionResponse {
        id,
        language,
        created_at: session.created_at,
    }))
}

/// GET /api/sessions/:id/pages/:page
pub async fn get_page(
    State(state): State<AppState>,
    Path((id, slug)): Path<(Uuid, String)>,
) -> Result<Json<PageResponse>, ApiError> {
    let kind = PageKind::from_slug(&slug).ok_or_else(|| ApiError::PageNotFound(slug.clone()))?;
    let handle = session_handle(&state, id).await?;
    let mut guard = handle.lock().await;
    let session = &mut *guard;

    let mut localizer = Localizer::new(&state.translator, &mut session.cache, session.language);
    let page = pages::render(kind, &mut localizer).await;
    let language = localizer.language();

    Ok(Json(PageResponse {
        language,
        page,
        warnings: localizer.into_warnings(),
    }))
}

// ════════════════════════════════════════════════════════════════════════════
// University finder
// ════════════════════════════════════════════════════════════════════════════

async fn filter_options(localizer: &mut Localizer<'_>, values: Vec<String>) -> Vec<FilterOption> {
    let mut options = Vec::with_capacity(values.len());
    for value in values {
        let label = localizer.text(&value).await;
        options.push(FilterOption { value, label });
    }
    options
}

/// GET /api/sessions/:id/filters
pub async fn get_filters(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FilterOptionsResponse>, ApiError> {
    let data = state.snapshot();
    let handle = session_handle(&state, id).await?;
    let mut guard = handle.lock().await;
    let session = &mut *guard;
    let mut localizer = Localizer::new(&state.translator, &mut session.cache, session.language);

    let heading = localizer.text(labels::FILTER_OPTIONS).await;
    let continent_label = localizer.text(labels::CONTINENT).await;
    let subject_label = localizer.text(labels::SUBJECT).await;
    let level_label = localizer.text(labels::DEGREE_LEVEL).await;
    let continents = filter_options(&mut localizer, data.catalog.continents()).await;
    let subjects = filter_options(&mut localizer, data.catalog.subjects()).await;
    let levels = filter_options(&mut localizer, data.catalog.levels()).await;

    Ok(Json(FilterOptionsResponse {
        heading,
        continent_label,
        subject_label,
        level_label,
        continents,
        subjects,
        levels,
        warnings: localizer.into_warnings(),
    }))
}

async fn finder_labels(localizer: &mut Localizer<'_>) -> FinderLabels {
    FinderLabels {
        search: localizer.text(labels::SEARCH_PLACEHOLDER).await,
        search_example: localizer.text(labels::SEARCH_EXAMPLE).await,
        rank: localizer.text(labels::RANK).await,
        continent: localizer.text(labels::CONTINENT).await,
        website: localizer.text(labels::WEBSITE).await,
        email: localizer.text(labels::EMAIL).await,
        application_opens: localizer.text(labels::APPLICATION_OPENS).await,
        tuition_range: localizer.text(labels::TUITION_RANGE).await,
        subject_expertise: localizer.text(labels::SUBJECT_EXPERTISE).await,
        available_subjects: localizer.text(labels::AVAILABLE_SUBJECTS).await,
        degree_levels: localizer.text(labels::DEGREE_LEVELS).await,
        showing_results: localizer.text(labels::SHOWING_RESULTS).await,
        download_csv: localizer.text(labels::DOWNLOAD_CSV).await,
    }
}

/// GET /api/sessions/:id/universities
pub async fn list_universities(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<FinderQuery>,
) -> Result<Json<FinderResponse>, ApiError> {
    let data = state.snapshot();
    let universities: Vec<UniversityView> = data
        .catalog
        .filter(&query.criteria())?
        .into_iter()
        .map(UniversityView::from)
        .collect();
    debug!(
        "Finder matched {} of {} universities",
        universities.len(),
        data.catalog.len()
    );

    let handle = session_handle(&state, id).await?;
    let mut guard = handle.lock().await;
    let session = &mut *guard;
    let mut localizer = Localizer::new(&state.translator, &mut session.cache, session.language);

    let captions = finder_labels(&mut localizer).await;
    let message = if data.catalog_error.is_some() {
        Some(localizer.text(labels::DATASET_UNAVAILABLE).await)
    } else if universities.is_empty() {
        Some(localizer.text(labels::NO_RESULTS).await)
    } else {
        None
    };

    Ok(Json(FinderResponse {
        count: universities.len(),
        universities,
        labels: captions,
        message,
        warnings: localizer.into_warnings(),
    }))
}

/// GET /api/sessions/:id/universities/export.csv
pub async fn export_universities(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<FinderQuery>,
) -> Result<Response, ApiError> {
    session_handle(&state, id).await?;

    let data = state.snapshot();
    let rows = data.catalog.filter(&query.criteria())?;
    let body = export_csv(&rows)?;
    info!("Exported {} universities as CSV", rows.len());

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
        ),
    ];
    Ok((headers, body).into_response())
}

// ════════════════════════════════════════════════════════════════════════════
// Assessment
// ════════════════════════════════════════════════════════════════════════════

async fn answer_options(localizer: &mut Localizer<'_>) -> Vec<AnswerOption> {
    let mut options = Vec::with_capacity(Likert::ALL.len());
    for answer in Likert::ALL {
        options.push(AnswerOption {
            value: answer.label(),
            label: localizer.text(answer.label()).await,
        });
    }
    options
}

async fn render_recommendation(
    recommendation: &Recommendation,
    catalog: &Catalog,
    per_subject: usize,
    localizer: &mut Localizer<'_>,
) -> RecommendationView {
    let heading = localizer.text(labels::RECOMMENDED_SUBJECTS).await;

    match recommendation {
        Recommendation::NoStrongSignal => RecommendationView {
            outcome: "no_strong_signal",
            heading,
            categories: Vec::new(),
            subjects: Vec::new(),
            message: localizer.text(labels::NO_STRONG_SIGNAL).await,
        },
        Recommendation::Subjects {
            categories,
            subjects,
        } => {
            let mut views = Vec::with_capacity(subjects.len());
            for entry in subjects {
                let (universities, universities_message) =
                    match catalog.top_universities_for_subject(&entry.subject, per_subject) {
                        SubjectUniversities::Found(rows) => (
                            rows.into_iter()
                                .map(|r| UniversityRank {
                                    university: r.university.clone(),
                                    rank: r.rank.clone(),
                                    website: r.website.clone(),
                                })
                                .collect(),
                            None,
                        ),
                        SubjectUniversities::NoneFound => (
                            Vec::new(),
                            Some(localizer.text(labels::NO_UNIVERSITIES_FOR_SUBJECT).await),
                        ),
                    };

                views.push(SubjectView {
                    subject: entry.subject.clone(),
                    label: localizer.text(&entry.subject).await,
                    count: entry.count,
                    universities,
                    universities_message,
                });
            }

            RecommendationView {
                outcome: "subjects",
                heading,
                categories: categories.clone(),
                subjects: views,
                message: localizer.text(labels::FINDER_HINT).await,
            }
        }
    }
}

/// GET /api/sessions/:id/assessment
pub async fn get_assessment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    let data = state.snapshot();
    let handle = session_handle(&state, id).await?;
    let mut guard = handle.lock().await;
    let session = &mut *guard;
    let mut localizer = Localizer::new(&state.translator, &mut session.cache, session.language);

    let title = localizer.text(labels::ASSESSMENT_TITLE).await;
    let intro = if data.assessment_error.is_some() {
        localizer.text(labels::ASSESSMENT_UNAVAILABLE).await
    } else {
        localizer.text(labels::ASSESSMENT_INTRO).await
    };
    let submit_label = localizer.text(labels::GET_RECOMMENDATION).await;

    let mut questions = Vec::with_capacity(data.assessment.questions().len());
    for (index, question) in data.assessment.questions().iter().enumerate() {
        questions.push(QuestionView {
            index,
            text: localizer.text(&question.text).await,
            category: question.category.clone(),
        });
    }
    let options = answer_options(&mut localizer).await;

    Ok(Json(AssessmentResponse {
        title,
        intro,
        submit_label,
        questions,
        options,
        warnings: localizer.into_warnings(),
    }))
}

/// POST /api/sessions/:id/assessment - score a complete answer sheet
pub async fn submit_assessment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SubmitAnswersRequest>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    let data = state.snapshot();
    let handle = session_handle(&state, id).await?;

    let answers = request
        .answers
        .iter()
        .map(|answer| answer.parse::<Likert>())
        .collect::<Result<Vec<_>, _>>()?;
    let scores = score_answers(&data.assessment, &answers)?;
    let recommendation = recommend(
        data.assessment.mapping(),
        &scores,
        state.config.recommendation_limits(),
    );
    info!(
        "Session {} assessment scored: {} subjects recommended",
        id,
        recommendation.subjects().len()
    );

    let mut guard = handle.lock().await;
    let session = &mut *guard;
    let mut localizer = Localizer::new(&state.translator, &mut session.cache, session.language);
    let view = render_recommendation(
        &recommendation,
        &data.catalog,
        state.config.universities_per_subject,
        &mut localizer,
    )
    .await;

    Ok(Json(RecommendationResponse {
        recommendation: view,
        warnings: localizer.into_warnings(),
    }))
}

async fn result_markdown(recommendation: &Recommendation, localizer: &mut Localizer<'_>) -> String {
    let mut text = format!("### {}:\n", localizer.text(labels::RECOMMENDED_SUBJECTS).await);
    match recommendation {
        Recommendation::Subjects { subjects, .. } => {
            for entry in subjects {
                text.push_str(&format!("- **{}**\n", localizer.text(&entry.subject).await));
            }
        }
        Recommendation::NoStrongSignal => {
            text.push_str(&localizer.text(labels::NO_STRONG_SIGNAL).await);
        }
    }
    text
}

async fn render_chat(
    chat: &ChatAssessment,
    data: &LoadedData,
    per_subject: usize,
    localizer: &mut Localizer<'_>,
) -> ChatResponse {
    let title = localizer.text(labels::ASSESSMENT_TITLE).await;
    let intro = if data.assessment_error.is_some() {
        localizer.text(labels::ASSESSMENT_UNAVAILABLE).await
    } else {
        localizer.text(labels::CHAT_INTRO).await
    };

    let mut transcript = Vec::with_capacity(chat.transcript().len());
    for message in chat.transcript() {
        let content = match message {
            ChatMessage::Greeting => localizer.text(labels::CHAT_GREETING).await,
            ChatMessage::Question(index) => match data.assessment.questions().get(*index) {
                Some(question) => localizer.text(&question.text).await,
                None => String::new(),
            },
            ChatMessage::Answer(answer) => localizer.text(answer.label()).await,
            ChatMessage::Result(recommendation) => result_markdown(recommendation, localizer).await,
        };
        transcript.push(ChatMessageView {
            role: message.role(),
            content,
        });
    }

    let complete = chat.is_complete(&data.assessment);
    let options = if complete || data.assessment.is_empty() {
        Vec::new()
    } else {
        answer_options(localizer).await
    };

    let result = match chat.result() {
        Some(recommendation) => {
            Some(render_recommendation(recommendation, &data.catalog, per_subject, localizer).await)
        }
        None => None,
    };

    ChatResponse {
        title,
        intro,
        step: chat.step(),
        total: data.assessment.questions().len(),
        complete,
        transcript,
        options,
        result,
        restart_label: localizer.text(labels::TAKE_AGAIN).await,
        notice: None,
        warnings: Vec::new(),
    }
}

/// Shared tail of the chat handlers: finish if the last answer is in, then
/// render the transcript in the session language.
async fn chat_view(
    state: &AppState,
    id: Uuid,
    session: &mut Session,
    data: &LoadedData,
    restarted: bool,
) -> Result<ChatResponse, ApiError> {
    if session.chat.is_complete(&data.assessment) && session.chat.result().is_none() {
        let recommendation = session
            .chat
            .finish(&data.assessment, state.config.recommendation_limits())?;
        info!(
            "Session {} chat assessment finished: {} subjects recommended",
            id,
            recommendation.subjects().len()
        );
    }

    let mut localizer = Localizer::new(&state.translator, &mut session.cache, session.language);
    let mut response = render_chat(
        &session.chat,
        data,
        state.config.universities_per_subject,
        &mut localizer,
    )
    .await;
    if restarted {
        response.notice = Some(localizer.text(labels::QUESTIONS_CHANGED).await);
    }
    response.warnings = localizer.into_warnings();
    Ok(response)
}

/// Restart a chat begun against an assessment document that has since been
/// reloaded.
fn sync_chat(id: Uuid, session: &mut Session, data: &LoadedData) -> bool {
    let restarted = session.sync_assessment(&data.assessment, data.generation);
    if restarted {
        info!("Session {} chat restarted: assessment questions were reloaded", id);
    }
    restarted
}

/// GET /api/sessions/:id/chat
pub async fn get_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChatResponse>, ApiError> {
    let data = state.snapshot();
    let handle = session_handle(&state, id).await?;
    let mut guard = handle.lock().await;
    let session = &mut *guard;

    let restarted = sync_chat(id, session, &data);
    Ok(Json(chat_view(&state, id, session, &data, restarted).await?))
}

/// POST /api/sessions/:id/chat/answer
///
/// An answer to a question from a since-reloaded document is discarded; the
/// chat restarts on the new first question instead.
pub async fn chat_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChatAnswerRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let answer: Likert = request.answer.parse()?;
    let data = state.snapshot();
    let handle = session_handle(&state, id).await?;
    let mut guard = handle.lock().await;
    let session = &mut *guard;

    let restarted = sync_chat(id, session, &data);
    if !restarted {
        session.chat.answer(&data.assessment, answer)?;
        debug!("Session {} answered step {}", id, session.chat.step());
    }
    Ok(Json(chat_view(&state, id, session, &data, restarted).await?))
}

/// POST /api/sessions/:id/chat/restart
pub async fn chat_restart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChatResponse>, ApiError> {
    let data = state.snapshot();
    let handle = session_handle(&state, id).await?;
    let mut guard = handle.lock().await;
    let session = &mut *guard;

    if !sync_chat(id, session, &data) {
        session.chat.restart(&data.assessment);
    }
    info!("Session {} restarted the chat assessment", id);
    Ok(Json(chat_view(&state, id, session, &data, false).await?))
}
