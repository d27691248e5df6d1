//! Scripted transport for sweep and resolve tests.
//!
//! Replies are keyed by exact URL; unknown URLs answer 404. Every request is
//! counted so tests can assert which candidates were (not) probed.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use recres_core::transport::{
    HttpRequest, HttpResponse, ResponseHeaders, Transport, TransportError,
};

#[derive(Debug, Clone)]
pub enum Reply {
    /// Status with an `audio/mpeg` content type.
    Audio(u32),
    /// Status with no headers.
    Status(u32),
    /// 200 with a JSON body.
    Json(String),
    /// Transport timeout, after sleeping for the given time.
    Timeout(Duration),
    /// Sleep, then answer with the inner reply.
    Delayed(Duration, Box<Reply>),
}

#[derive(Default)]
pub struct MockTransport {
    replies: HashMap<String, Reply>,
    calls: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, url: &str, reply: Reply) -> Self {
        self.replies.insert(url.to_string(), reply);
        self
    }

    /// Every URL requested, in request order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
    }

    fn answer(reply: &Reply) -> Result<HttpResponse, TransportError> {
        match reply {
            Reply::Audio(status) => Ok(HttpResponse {
                status: *status,
                headers: ResponseHeaders {
                    content_type: Some("audio/mpeg".to_string()),
                    content_length: Some(1_048_576),
                    location: None,
                },
                body: Vec::new(),
            }),
            Reply::Status(status) => Ok(HttpResponse {
                status: *status,
                ..HttpResponse::default()
            }),
            Reply::Json(body) => Ok(HttpResponse {
                status: 200,
                headers: ResponseHeaders {
                    content_type: Some("application/json".to_string()),
                    ..ResponseHeaders::default()
                },
                body: body.as_bytes().to_vec(),
            }),
            Reply::Timeout(after) => {
                std::thread::sleep(*after);
                Err(TransportError::timeout("operation timed out"))
            }
            Reply::Delayed(after, inner) => {
                std::thread::sleep(*after);
                Self::answer(inner)
            }
        }
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.lock().unwrap().push(request.url.clone());
        match self.replies.get(&request.url) {
            Some(reply) => Self::answer(reply),
            None => Ok(HttpResponse {
                status: 404,
                ..HttpResponse::default()
            }),
        }
    }
}

/// Edition listing body in the metadata API's shape.
pub fn edition_listing() -> String {
    r#"{"code":200,"status":"OK","data":[
        {"identifier":"ar.abdulbasitmurattal","language":"ar","name":"عبد الباسط عبد الصمد المرتل","englishName":"Abdul Basit","format":"audio","type":"versebyverse","direction":null},
        {"identifier":"ar.alafasy","language":"ar","name":"مشاري العفاسي","englishName":"Alafasy","format":"audio","type":"versebyverse","direction":null},
        {"identifier":"ar.yasseraldossari","language":"ar","name":"ياسر الدوسري","englishName":"Yasser Al-Dossari","format":"audio","type":"versebyverse","direction":null},
        {"identifier":"ar.hudhaify","language":"ar","name":"علي بن عبدالرحمن الحذيفي","englishName":"Hudhaify","format":"audio","type":"versebyverse","direction":null},
        {"identifier":"en.walk","language":"en","name":"Ibrahim Walk","englishName":"Ibrahim Walk","format":"audio","type":"versebyverse","direction":null}
    ]}"#
    .to_string()
}
