//! Per-turn orchestration
//!
//! One `process` call per user message: classify, extract, update the session
//! value, build the prompt, complete, append history. Every failure is
//! absorbed into a user-facing reply; `process` itself cannot fail.

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tokio::sync::mpsc;

use concierge_core::{Language, ServiceCategory, Turn, TurnRole};
use concierge_extract::{
    detect_requirements, detect_service_request, is_affirmative, is_general_topic,
    is_room_intent, GuestExtractor,
};
use concierge_llm::{CompletionClient, Message, PromptBuilder};
use concierge_store::{
    Booking, BookingStatus, BookingStore, KeyValueStore, RoomStore, ServiceOrder,
    ServiceOrderStore, ServiceStore,
};

use crate::cancellation::{CancelAction, CancellationFlow, CancellationStage};
use crate::funnel::FunnelStep;
use crate::session::{PendingServiceOrder, SessionState};
use crate::special::ActivatedBy;

/// The conversation agent
pub struct ConciergeAgent {
    client: Arc<dyn CompletionClient>,
    rooms: RoomStore,
    bookings: BookingStore,
    services: ServiceStore,
    orders: ServiceOrderStore,
    extractor: GuestExtractor,
    hotel_name: String,
    hotel_info: String,
}

impl ConciergeAgent {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        store: Arc<dyn KeyValueStore>,
        hotel_name: impl Into<String>,
        hotel_info: impl Into<String>,
    ) -> Self {
        Self {
            client,
            rooms: RoomStore::new(store.clone()),
            bookings: BookingStore::new(store.clone()),
            services: ServiceStore::new(store.clone()),
            orders: ServiceOrderStore::new(store),
            extractor: GuestExtractor::new(),
            hotel_name: hotel_name.into(),
            hotel_info: hotel_info.into(),
        }
    }

    /// Process one user turn, returning the next session state and the reply
    pub async fn process(&self, state: SessionState, message: &str) -> (SessionState, String) {
        self.process_inner(state, message, None).await
    }

    /// Streaming variant: reply deltas go to `tx`, the full reply is returned
    pub async fn process_stream(
        &self,
        state: SessionState,
        message: &str,
        tx: mpsc::Sender<String>,
    ) -> (SessionState, String) {
        self.process_inner(state, message, Some(tx)).await
    }

    async fn process_inner(
        &self,
        mut state: SessionState,
        message: &str,
        tx: Option<mpsc::Sender<String>>,
    ) -> (SessionState, String) {
        let reference = Utc::now().date_naive();
        let details = self.extractor.extract(message, reference);
        let language = state.language;

        // The cancellation flow owns the conversation while active
        if state.cancellation.is_active {
            let reply = self.cancellation_turn(&mut state, message, &details).await;
            return finish_turn(state, message, reply);
        }
        if let Some(action) = CancellationFlow::detect_request(message) {
            state.cancellation.activate(action);
            let reply = CancellationFlow::ask_search_params_message(language).to_string();
            return finish_turn(state, message, reply);
        }

        // A pending room-service offer is settled by the guest's agreement;
        // any other reply drops the offer and the message is handled normally
        if let Some(pending) = state.pending_service.take() {
            if is_affirmative(message) {
                let order = ServiceOrder::new(pending.category, &pending.details);
                let reply = if self.orders.add(order).await {
                    service_confirmation(language, pending.category)
                } else {
                    fallback_message(language).to_string()
                };
                return finish_turn(state, message, reply);
            }
        }

        // Service classification is advisory: the model still answers the
        // turn and offers the service; the order is only written once the
        // guest confirms on a later turn
        if let Some(category) = detect_service_request(message) {
            state.pending_service = Some(PendingServiceOrder {
                category,
                details: message.trim().to_string(),
            });
            tracing::info!(
                category = category.as_str(),
                "Possible room-service request, awaiting confirmation"
            );
        }

        let tags = detect_requirements(message);
        if !tags.is_empty() {
            state.special.activate(ActivatedBy::Auto);
            state.special.add_requirements(&tags);
            for tag in &tags {
                let pref = tag.as_str().to_string();
                if !state.funnel.data.preferences.contains(&pref) {
                    state.funnel.data.preferences.push(pref);
                }
            }
        }

        // A general hotel topic abandons the room-specific focus
        if is_general_topic(message) {
            state.funnel.data.selected_room = None;
            state.funnel.data.selected_room_name = None;
        }

        if is_room_intent(message) {
            state.funnel.start();
        }
        state.funnel.absorb(&details);

        if state.funnel.step() == FunnelStep::SuggestingRooms {
            self.try_select_room(&mut state, message).await;
        }

        if state.funnel.step() == FunnelStep::Completed && !state.funnel.has_active_booking {
            let reply = self.finalize_booking(&mut state).await;
            return finish_turn(state, message, reply);
        }

        let mut context = self.render_context(&state).await;
        if let Some(ref pending) = state.pending_service {
            let _ = write!(
                context,
                "\nThe guest may be asking for room service ({}). Answer their \
                 question, offer to arrange it and ask them to confirm; the order \
                 is placed only after they agree.",
                pending.category.as_str()
            );
        }
        let history = history_messages(&state);
        let next_field = if state.funnel.is_active() {
            state.funnel.next_missing_field()
        } else {
            None
        };
        let prompt = PromptBuilder::new()
            .system_prompt(&self.hotel_name, &self.hotel_info, language)
            .with_context(&context)
            .with_collected(&state.funnel.progress_summary())
            .with_next_field(next_field)
            .with_history(&history)
            .user_message(message)
            .build();

        let result = match tx {
            Some(tx) => self.client.complete_stream(&prompt, tx).await,
            None => self.client.complete(&prompt).await,
        };

        let reply = match result {
            Ok(text) => {
                // Each completed round trip advances a special booking
                if state.special.is_active {
                    state.special.advance();
                }
                text
            },
            Err(e) => {
                tracing::error!(error = %e, "Completion failed, using fallback reply");
                fallback_message(language).to_string()
            },
        };

        finish_turn(state, message, reply)
    }

    async fn cancellation_turn(
        &self,
        state: &mut SessionState,
        message: &str,
        details: &concierge_core::GuestDetails,
    ) -> String {
        let language = state.language;
        match state.cancellation.stage {
            CancellationStage::Initial | CancellationStage::AwaitingSearchParams => {
                let (query, kind) = if let Some(ref phone) = details.phone {
                    (phone.clone(), "phone")
                } else if let Some(ref name) = details.full_name {
                    (name.clone(), "name")
                } else {
                    (message.trim().to_string(), "text")
                };

                let matches = self.bookings.find_active_by_guest(&query).await;
                match matches.into_iter().next() {
                    Some(booking) => {
                        state.cancellation.await_confirmation(booking.id);
                        confirm_prompt(language, &booking)
                    },
                    None => {
                        if state.cancellation.record_failed_search(kind) {
                            CancellationFlow::operator_message(language).to_string()
                        } else {
                            CancellationFlow::not_found_message(language).to_string()
                        }
                    },
                }
            },
            CancellationStage::AwaitingConfirmation => {
                if CancellationFlow::is_confirmation(message) {
                    let action = state.cancellation.action;
                    let pending = state.cancellation.pending_booking;
                    state.cancellation.deactivate();

                    let Some(id) = pending else {
                        return fallback_message(language).to_string();
                    };
                    let booking = self.bookings.find(id).await;
                    if !self.bookings.update_status(id, BookingStatus::Cancelled).await {
                        return fallback_message(language).to_string();
                    }

                    if action == Some(CancelAction::CancelAndRebook) {
                        // Re-enter the funnel at date collection with the
                        // guest identity pre-filled
                        if let Some(booking) = booking {
                            state.funnel.reset();
                            state.funnel.start();
                            state.funnel.data.full_name = Some(booking.guest_name);
                            state.funnel.data.phone = Some(booking.phone);
                            state.funnel.data.email = booking.email;
                        }
                        CancellationFlow::rebook_message(language).to_string()
                    } else {
                        state.funnel.has_active_booking = false;
                        CancellationFlow::cancelled_message(language).to_string()
                    }
                } else if CancellationFlow::is_decline(message) {
                    state.cancellation.deactivate();
                    CancellationFlow::kept_message(language).to_string()
                } else {
                    match state.cancellation.pending_booking {
                        Some(id) => match self.bookings.find(id).await {
                            Some(booking) => confirm_prompt(language, &booking),
                            None => fallback_message(language).to_string(),
                        },
                        None => fallback_message(language).to_string(),
                    }
                }
            },
        }
    }

    /// Match a room mentioned by name; ignore rooms already booked for the
    /// collected dates.
    async fn try_select_room(&self, state: &mut SessionState, message: &str) {
        let lowered = message.to_lowercase();
        let dates = stay_dates(&state.funnel.data);
        for room in self.rooms.all().await {
            if !lowered.contains(&room.name.to_lowercase()) {
                continue;
            }
            if let Some((check_in, check_out)) = dates {
                if !self
                    .bookings
                    .is_room_available(&room.id, check_in, check_out)
                    .await
                {
                    continue;
                }
            }
            state.funnel.select_room(&room.id, &room.name);
            return;
        }
    }

    /// All five slots are filled: write the booking and emit the fixed
    /// confirmation.
    async fn finalize_booking(&self, state: &mut SessionState) -> String {
        let language = state.language;
        let data = state.funnel.data.clone();

        let (Some(name), Some(phone), Some(room_id)) =
            (data.full_name, data.phone, data.selected_room)
        else {
            return fallback_message(language).to_string();
        };
        let Some((check_in, check_out)) = stay_dates(&state.funnel.data) else {
            // Unparseable dates should not survive extraction; start over
            state.funnel.data.check_in = None;
            state.funnel.data.check_out = None;
            return fallback_message(language).to_string();
        };

        if !self
            .bookings
            .is_room_available(&room_id, check_in, check_out)
            .await
        {
            state.funnel.data.selected_room = None;
            state.funnel.data.selected_room_name = None;
            return room_taken_message(language);
        }

        let mut booking = Booking::new(&name, &phone, &room_id, check_in, check_out);
        booking.email = state.funnel.data.email.clone();
        booking.guests = state.funnel.data.guests.unwrap_or(1);
        if let Some(room) = self.rooms.find(&room_id).await {
            booking.total_price = room.price_per_night * booking.nights() as f64;
        }

        if !self.bookings.add(booking).await {
            return fallback_message(language).to_string();
        }

        state.funnel.has_active_booking = true;
        if state.special.is_active {
            state.special.complete();
        }
        state.funnel.confirmation_message(language)
    }

    /// Room and service inventory plus, when the stay dates are known,
    /// availability
    async fn render_context(&self, state: &SessionState) -> String {
        let rooms = self.rooms.all().await;
        let services = self.services.all().await;
        if rooms.is_empty() && services.is_empty() {
            return String::new();
        }

        let mut out = String::new();
        if !rooms.is_empty() {
            out.push_str("Rooms:\n");
        }
        for room in &rooms {
            let _ = writeln!(
                out,
                "- {} (id {}): {:.0} UAH/night, up to {} guests. {}{}",
                room.name,
                room.id,
                room.price_per_night,
                room.capacity,
                room.description,
                if room.amenities.is_empty() {
                    String::new()
                } else {
                    format!(" Amenities: {}.", room.amenities.join(", "))
                }
            );
        }

        if let Some((check_in, check_out)) = stay_dates(&state.funnel.data) {
            let _ = writeln!(out, "\nAvailability for {} to {}:", check_in, check_out);
            for room in &rooms {
                let free = self
                    .bookings
                    .is_room_available(&room.id, check_in, check_out)
                    .await;
                let _ = writeln!(
                    out,
                    "- {}: {}",
                    room.name,
                    if free { "available" } else { "already booked" }
                );
            }
        }

        let offered: Vec<_> = services.iter().filter(|s| s.available).collect();
        if !offered.is_empty() {
            let _ = writeln!(out, "\nServices:");
            for service in offered {
                let _ = writeln!(
                    out,
                    "- {} ({}): {:.0} UAH",
                    service.name,
                    service.category.as_str(),
                    service.price
                );
            }
        }
        out
    }
}

fn finish_turn(
    mut state: SessionState,
    message: &str,
    reply: String,
) -> (SessionState, String) {
    state.history.push(Turn::user(message));
    state.history.push(Turn::assistant(reply.clone()));
    (state, reply)
}

fn history_messages(state: &SessionState) -> Vec<Message> {
    state
        .history
        .turns()
        .iter()
        .filter_map(|turn| match turn.role {
            TurnRole::User => Some(Message::user(&turn.content)),
            TurnRole::Assistant => Some(Message::assistant(&turn.content)),
            TurnRole::System => None,
        })
        .collect()
}

fn stay_dates(data: &crate::funnel::CollectedData) -> Option<(NaiveDate, NaiveDate)> {
    let check_in = NaiveDate::parse_from_str(data.check_in.as_deref()?, "%Y-%m-%d").ok()?;
    let check_out = NaiveDate::parse_from_str(data.check_out.as_deref()?, "%Y-%m-%d").ok()?;
    Some((check_in, check_out))
}

fn confirm_prompt(language: Language, booking: &Booking) -> String {
    match language {
        Language::Uk => format!(
            "Знайшла бронювання: {}, заїзд {}, виїзд {}. Підтверджуєте скасування?",
            booking.guest_name, booking.check_in, booking.check_out
        ),
        Language::Ru => format!(
            "Нашла бронирование: {}, заезд {}, выезд {}. Подтверждаете отмену?",
            booking.guest_name, booking.check_in, booking.check_out
        ),
        Language::En => format!(
            "I found a booking for {} from {} to {}. Do you confirm the cancellation?",
            booking.guest_name, booking.check_in, booking.check_out
        ),
    }
}

fn fallback_message(language: Language) -> &'static str {
    match language {
        Language::Uk => {
            "Вибачте, сталася технічна помилка. Спробуйте, будь ласка, ще раз за хвилину."
        },
        Language::Ru => {
            "Извините, произошла техническая ошибка. Попробуйте, пожалуйста, ещё раз через минуту."
        },
        Language::En => "Sorry, something went wrong on our side. Please try again in a minute.",
    }
}

fn room_taken_message(language: Language) -> String {
    match language {
        Language::Uk => {
            "На жаль, цей номер щойно зайняли на ваші дати. Оберіть, будь ласка, інший номер."
        },
        Language::Ru => {
            "К сожалению, этот номер только что заняли на ваши даты. Выберите, пожалуйста, другой номер."
        },
        Language::En => {
            "Unfortunately that room has just been taken for your dates. Please pick another one."
        },
    }
    .to_string()
}

fn service_confirmation(language: Language, category: ServiceCategory) -> String {
    let label = category_label(language, category);
    match language {
        Language::Uk => format!(
            "Прийнято! Передаю ваше замовлення ({label}) персоналу, його виконають найближчим часом."
        ),
        Language::Ru => format!(
            "Принято! Передаю ваш заказ ({label}) персоналу, его выполнят в ближайшее время."
        ),
        Language::En => format!(
            "Got it! I've passed your {label} request to our staff, they'll take care of it shortly."
        ),
    }
}

fn category_label(language: Language, category: ServiceCategory) -> &'static str {
    match (language, category) {
        (Language::Uk, ServiceCategory::Food) => "їжа в номер",
        (Language::Uk, ServiceCategory::Cleaning) => "прибирання",
        (Language::Uk, ServiceCategory::Towels) => "рушники",
        (Language::Uk, ServiceCategory::Minibar) => "мінібар",
        (Language::Ru, ServiceCategory::Food) => "еда в номер",
        (Language::Ru, ServiceCategory::Cleaning) => "уборка",
        (Language::Ru, ServiceCategory::Towels) => "полотенца",
        (Language::Ru, ServiceCategory::Minibar) => "минибар",
        (Language::En, ServiceCategory::Food) => "food",
        (Language::En, ServiceCategory::Cleaning) => "cleaning",
        (Language::En, ServiceCategory::Towels) => "towels",
        (Language::En, ServiceCategory::Minibar) => "minibar",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use concierge_llm::LlmError;
    use concierge_store::{MemoryStore, Room};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted completion client
    struct FakeClient {
        replies: Mutex<VecDeque<String>>,
        fail: bool,
    }

    impl FakeClient {
        fn with_replies(replies: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.iter().map(|s| s.to_string()).collect()),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(VecDeque::new()),
                fail: true,
            })
        }

        fn next_reply(&self) -> Result<String, LlmError> {
            if self.fail {
                return Err(LlmError::Network("connection refused".to_string()));
            }
            Ok(self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| "ok".to_string()))
        }
    }

    #[async_trait]
    impl CompletionClient for FakeClient {
        async fn complete(&self, _messages: &[Message]) -> Result<String, LlmError> {
            self.next_reply()
        }

        async fn complete_stream(
            &self,
            _messages: &[Message],
            tx: mpsc::Sender<String>,
        ) -> Result<String, LlmError> {
            let reply = self.next_reply()?;
            let _ = tx.send(reply.clone()).await;
            Ok(reply)
        }
    }

    fn sample_room() -> Room {
        Room {
            id: "lux-1".to_string(),
            name: "Suite".to_string(),
            description: "Suite with a sea view".to_string(),
            price_per_night: 4200.0,
            capacity: 4,
            amenities: vec!["jacuzzi".to_string()],
        }
    }

    async fn agent_with(
        client: Arc<dyn CompletionClient>,
    ) -> (ConciergeAgent, Arc<MemoryStore>) {
        let kv = Arc::new(MemoryStore::new());
        let rooms = RoomStore::new(kv.clone());
        rooms.replace_all(&[sample_room()]).await;
        let agent = ConciergeAgent::new(client, kv.clone(), "Sunrise", "Seafront hotel");
        (agent, kv)
    }

    #[tokio::test]
    async fn test_full_funnel_writes_booking() {
        let (agent, kv) = agent_with(FakeClient::with_replies(&["Як вас звати?", "Ваш телефон?"])).await;
        let state = SessionState::new(Language::Uk);

        let (state, _) = agent.process(state, "Хочу забронювати номер").await;
        assert_eq!(state.funnel.step(), FunnelStep::CollectingName);

        let (state, _) = agent
            .process(
                state,
                "Мене звати Олег Коваль, телефон +380671112233, пошта oleg@mail.com, 15.01.2026-20.01.2026",
            )
            .await;
        assert_eq!(state.funnel.step(), FunnelStep::SuggestingRooms);

        let (state, reply) = agent.process(state, "Беру Suite").await;
        assert_eq!(state.funnel.step(), FunnelStep::Completed);
        assert!(state.funnel.has_active_booking);
        assert!(reply.contains("Suite"));

        let bookings = BookingStore::new(kv).all().await;
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].guest_name, "Олег Коваль");
        assert_eq!(bookings[0].nights(), 5);
        assert_eq!(bookings[0].total_price, 5.0 * 4200.0);
        assert_eq!(bookings[0].status, BookingStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_llm_failure_uses_fallback() {
        let (agent, _) = agent_with(FakeClient::failing()).await;
        let state = SessionState::new(Language::En);
        let (state, reply) = agent.process(state, "Tell me about the hotel").await;
        assert_eq!(reply, fallback_message(Language::En));
        // The failed turn still lands in history
        assert_eq!(state.history.len(), 2);
    }

    #[tokio::test]
    async fn test_service_order_placed_only_after_confirmation() {
        let (agent, kv) =
            agent_with(FakeClient::with_replies(&["Бажаєте, щоб я замовила рушники?"])).await;
        let orders = ServiceOrderStore::new(kv);
        let state = SessionState::new(Language::Uk);

        // The request only produces an offer; nothing is written yet
        let (state, _) = agent.process(state, "принесіть рушники в номер").await;
        assert_eq!(
            state.pending_service.as_ref().map(|p| p.category),
            Some(ServiceCategory::Towels)
        );
        assert!(orders.all().await.is_empty());

        let (state, reply) = agent.process(state, "так, будь ласка").await;
        assert!(reply.contains("рушники"));
        assert!(state.pending_service.is_none());

        let placed = orders.all().await;
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].category, ServiceCategory::Towels);
        assert!(placed[0].details.contains("рушники"));
    }

    #[tokio::test]
    async fn test_ambiguous_service_mention_still_reaches_model() {
        let (agent, kv) = agent_with(FakeClient::with_replies(&[
            "The restaurant is open until 23:00. Shall I have food brought to your room?",
        ]))
        .await;
        let orders = ServiceOrderStore::new(kv);
        let state = SessionState::new(Language::En);

        // A food word inside a general question must not place an order;
        // the model answers the question and makes the offer
        let (state, reply) = agent
            .process(state, "I'm hungry, is the restaurant open?")
            .await;
        assert!(reply.contains("restaurant"));
        assert_eq!(
            state.pending_service.as_ref().map(|p| p.category),
            Some(ServiceCategory::Food)
        );
        assert!(orders.all().await.is_empty());

        // Declining drops the offer without creating an order
        let (state, _) = agent.process(state, "no thanks, I'll come down").await;
        assert!(state.pending_service.is_none());
        assert!(orders.all().await.is_empty());
    }

    #[tokio::test]
    async fn test_complex_request_activates_special_once() {
        let (agent, _) = agent_with(FakeClient::with_replies(&["ok", "ok"])).await;
        let state = SessionState::new(Language::Uk);

        let (state, _) = agent.process(state, "хочу номер з джакузі").await;
        assert!(state.special.is_active);
        assert_eq!(state.special.activated_by, Some(ActivatedBy::Auto));
        let stage = state.special.stage;

        // Mentioning jacuzzi again neither re-activates nor duplicates the tag
        let (state, _) = agent.process(state, "обов'язково з джакузі").await;
        assert_eq!(
            state
                .special
                .requirements
                .iter()
                .filter(|t| **t == concierge_core::RequirementTag::Jacuzzi)
                .count(),
            1
        );
        assert_ne!(state.special.stage, stage); // advanced by the round trip
    }

    #[tokio::test]
    async fn test_general_topic_clears_room_focus() {
        let (agent, _) = agent_with(FakeClient::with_replies(&["breakfast is at 8"])).await;
        let mut state = SessionState::new(Language::En);
        state.funnel.select_room("lux-1", "Suite");

        let (state, _) = agent.process(state, "what time is breakfast?").await;
        assert!(state.funnel.data.selected_room.is_none());
    }

    #[tokio::test]
    async fn test_cancellation_flow_with_bound() {
        let (agent, kv) = agent_with(FakeClient::with_replies(&[])).await;

        // Seed a confirmed booking
        let store = BookingStore::new(kv.clone());
        let booking = Booking::new(
            "Олена Шевченко",
            "+380671112233",
            "lux-1",
            NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 5).unwrap(),
        );
        store.add(booking.clone()).await;

        let state = SessionState::new(Language::Uk);
        let (state, reply) = agent.process(state, "хочу скасувати бронювання").await;
        assert!(state.cancellation.is_active);
        assert_eq!(reply, CancellationFlow::ask_search_params_message(Language::Uk));

        // Two misses, then a hit
        let (state, _) = agent.process(state, "Петро Іваненко").await;
        assert_eq!(state.cancellation.search_attempts, 1);
        let (state, _) = agent.process(state, "Іван Сидоренко").await;
        assert_eq!(state.cancellation.search_attempts, 2);

        let (state, reply) = agent.process(state, "Олена Шевченко").await;
        assert_eq!(state.cancellation.stage, CancellationStage::AwaitingConfirmation);
        assert!(reply.contains("Олена Шевченко"));

        let (state, reply) = agent.process(state, "так").await;
        assert!(!state.cancellation.is_active);
        assert_eq!(reply, CancellationFlow::cancelled_message(Language::Uk));
        assert_eq!(
            store.find(booking.id).await.unwrap().status,
            BookingStatus::Cancelled
        );
    }

    #[tokio::test]
    async fn test_cancellation_bound_hands_off_to_operator() {
        let (agent, _) = agent_with(FakeClient::with_replies(&[])).await;
        let state = SessionState::new(Language::En);

        let (state, _) = agent.process(state, "cancel my booking please").await;
        let (state, _) = agent.process(state, "John Smith").await;
        let (state, _) = agent.process(state, "Jane Smith").await;
        let (state, reply) = agent.process(state, "James Smith").await;

        assert_eq!(reply, CancellationFlow::operator_message(Language::En));
        assert!(!state.cancellation.is_active);
    }

    #[tokio::test]
    async fn test_rebook_prefills_identity_and_reenters_at_dates() {
        let (agent, kv) = agent_with(FakeClient::with_replies(&[])).await;
        let store = BookingStore::new(kv.clone());
        let mut booking = Booking::new(
            "Олег Коваль",
            "+380671112233",
            "lux-1",
            NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 5).unwrap(),
        );
        booking.email = Some("oleg@mail.com".to_string());
        store.add(booking.clone()).await;

        let state = SessionState::new(Language::Uk);
        let (state, _) = agent
            .process(state, "хочу перенести бронювання на інші дати")
            .await;
        let (state, _) = agent.process(state, "+380671112233").await;
        let (state, reply) = agent.process(state, "так, підтверджую").await;

        assert_eq!(reply, CancellationFlow::rebook_message(Language::Uk));
        assert_eq!(state.funnel.step(), FunnelStep::CollectingDates);
        assert_eq!(state.funnel.data.full_name.as_deref(), Some("Олег Коваль"));
        assert_eq!(state.funnel.data.email.as_deref(), Some("oleg@mail.com"));
        assert_eq!(
            store.find(booking.id).await.unwrap().status,
            BookingStatus::Cancelled
        );
    }

    #[tokio::test]
    async fn test_streaming_delivers_deltas() {
        let (agent, _) = agent_with(FakeClient::with_replies(&["Вітаю!"])).await;
        let state = SessionState::new(Language::Uk);
        let (tx, mut rx) = mpsc::channel(8);

        let (_, reply) = agent.process_stream(state, "привіт", tx).await;
        assert_eq!(reply, "Вітаю!");
        assert_eq!(rx.recv().await.as_deref(), Some("Вітаю!"));
    }
}
