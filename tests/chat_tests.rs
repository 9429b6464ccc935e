use dotenv::dotenv;
use meal_recommender::chat::faq::{quick_answer, DEFAULT_ANSWER};
use meal_recommender::chat::openrouter::OPENROUTER_MODELS;
use meal_recommender::chat::{
    build_request, ChatBackend, ChatCompletionRequest, ChatError, ChatMessage, Provider,
};
use std::env;

const TEST_API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";
const MISSING_KEY_ENV_VAR: &str = "THIS_KEY_SHOULD_NOT_EXIST_IN_ENV_MEALREC";

fn get_cerebras_test_model() -> String {
    OPENROUTER_MODELS
        .iter()
        .find(|m| m.model_source == "cerebras")
        .map(|m| m.model_name.to_string())
        .expect("No Cerebras model found in OPENROUTER_MODELS for testing")
}

fn setup_test_environment() {
    dotenv().ok();
}

#[tokio::test]
async fn test_missing_api_key_error() {
    setup_test_environment();
    let provider = Provider::openrouter(MISSING_KEY_ENV_VAR);
    let request = ChatCompletionRequest {
        model: get_cerebras_test_model(),
        messages: vec![ChatMessage::user("Hello")],
        temperature: None,
        max_tokens: None,
    };
    let result = provider.call_chat_completion(request).await;
    match result {
        Err(ChatError::MissingApiKey(key_name)) => assert_eq!(key_name, MISSING_KEY_ENV_VAR),
        other => panic!("expected MissingApiKey, got {other:?}"),
    }
}

#[tokio::test]
async fn test_generative_backend_folds_errors_into_answer() {
    setup_test_environment();
    let backend = ChatBackend::generative(MISSING_KEY_ENV_VAR, get_cerebras_test_model());
    let answer = backend
        .answer("No recommendations available.", "", "Is this healthy?")
        .await;
    assert!(answer.starts_with("Sorry, I encountered an error: API key not found"), "{answer}");
}

#[tokio::test]
async fn test_faq_backend_routes_questions() {
    let backend = ChatBackend::Faq;
    let answer = backend.answer("", "", "What can I substitute for eggs?").await;
    assert_eq!(answer, quick_answer("swap"));
    assert_eq!(backend.answer("", "", "Tell me a joke").await, DEFAULT_ANSWER);
}

#[test]
fn test_request_carries_context_and_settings() {
    let request = build_request(
        &get_cerebras_test_model(),
        "Recommended Recipes:\n\n1. Oats",
        "User: hi\nAssistant: hello\nUser: latest",
        "Can I add honey?",
    );
    assert_eq!(request.temperature, Some(0.7));
    assert!(request.messages[0].content.contains("1. Oats"));
    assert_eq!(request.messages.len(), 4);
    assert_eq!(request.messages[3].content, "Can I add honey?");
}

#[tokio::test]
#[ignore]
async fn test_successful_generative_answer() {
    setup_test_environment();
    if env::var(TEST_API_KEY_ENV_VAR).is_err() {
        println!(
            "Skipping test_successful_generative_answer: {} not set.",
            TEST_API_KEY_ENV_VAR
        );
        return;
    }

    let backend = ChatBackend::generative(TEST_API_KEY_ENV_VAR, get_cerebras_test_model());
    let answer = backend
        .answer(
            "Recommended Recipes:\n\n1. Oatmeal with berries",
            "",
            "Is the oatmeal a good breakfast? Respond concisely.",
        )
        .await;
    assert!(!answer.is_empty());
    assert!(!answer.starts_with("Sorry, I encountered an error"), "{answer}");
}
