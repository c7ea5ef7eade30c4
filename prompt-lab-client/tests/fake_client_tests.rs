use proptest::prelude::*;
use prompt_lab_client::{FakeLlmClient, LlmClient};
use prompt_lab_core::CompletionRequest;

fn complete_blocking(request: &CompletionRequest) -> prompt_lab_core::CompletionResponse {
    tokio_test::block_on(FakeLlmClient::new().complete(request)).unwrap()
}

proptest! {
    #[test]
    fn fake_client_is_pure(prompt in ".{0,300}", model in "[a-z0-9-]{1,20}") {
        let request = CompletionRequest::new(model, prompt);

        let first = complete_blocking(&request);
        let second = complete_blocking(&request);

        prop_assert_eq!(first, second);
    }

    #[test]
    fn fake_client_counts_words(prompt in "[a-z ]{0,200}") {
        let request = CompletionRequest::new("gpt-test", prompt.clone());
        let response = complete_blocking(&request);

        prop_assert_eq!(response.tokens_input, Some(prompt.split_whitespace().count() as u32));
        prop_assert_eq!(
            response.tokens_output,
            Some(response.text.split_whitespace().count() as u32)
        );
        prop_assert!(response.text.starts_with("[DUMMY RESPONSE]"));
        prop_assert!(response.text.ends_with("This is a fake answer for model 'gpt-test'."));
    }
}

#[tokio::test]
async fn test_fake_client_through_trait_object() {
    let client: Box<dyn LlmClient> = Box::new(FakeLlmClient::new());
    let response = client
        .complete(&CompletionRequest::new("m", "line one\nline two"))
        .await
        .unwrap();

    assert!(response.text.contains("'line one line two...'"));
}
