pub mod ask_question_route;
pub mod ask_request;
pub mod session_route;
