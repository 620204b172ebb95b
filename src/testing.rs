//! In-memory controller for tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde_json::{Value, json};

use crate::config::ControllerConfig;
use crate::errors::Error;
use crate::runtime::{BoxFuture, Connector, MessageSocket};

pub(crate) const SECRET: &str = "MDEyMzQ1Njc4OWFiY2RlZjAxMjM0NTY3ODlhYmNkZWY=";

pub(crate) fn config() -> ControllerConfig {
    ControllerConfig::new("controller.test", 12345, SECRET)
}

/// What the fake controller does with one request.
pub(crate) enum Reply {
    Json(Value),
    Raw(String),
    /// Break the connection instead of answering.
    Drop,
    /// Never answer.
    Silent,
}

type Handler = Box<dyn Fn(&Value) -> Reply + Send + Sync>;

struct State {
    handler: Handler,
    sent: Vec<(Instant, Value)>,
    connects: usize,
    closes: usize,
    refuse: bool,
    fail_close: bool,
}

#[derive(Clone)]
pub(crate) struct MockController {
    state: Arc<Mutex<State>>,
}

impl MockController {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&Value) -> Reply + Send + Sync + 'static,
    {
        MockController {
            state: Arc::new(Mutex::new(State {
                handler: Box::new(handler),
                sent: Vec::new(),
                connects: 0,
                closes: 0,
                refuse: false,
                fail_close: false,
            })),
        }
    }

    /// Answers every request with `{"code": 0, "data": <request_id>}`.
    pub fn echo() -> Self {
        Self::new(|req| Reply::Json(json!({"code": 0, "data": req["request_id"]})))
    }

    pub fn connector(&self) -> MockConnector {
        MockConnector(self.clone())
    }

    pub fn refuse_connections(&self, refuse: bool) {
        self.state.lock().unwrap().refuse = refuse;
    }

    /// Make every socket's `close` report an error.
    pub fn fail_close(&self, fail: bool) {
        self.state.lock().unwrap().fail_close = fail;
    }

    pub fn connects(&self) -> usize {
        self.state.lock().unwrap().connects
    }

    pub fn closes(&self) -> usize {
        self.state.lock().unwrap().closes
    }

    pub fn sent(&self) -> Vec<Value> {
        self.state.lock().unwrap().sent.iter().map(|(_, v)| v.clone()).collect()
    }

    pub fn sent_actions(&self) -> Vec<String> {
        self.sent()
            .iter()
            .map(|v| v["action"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    pub fn send_times(&self) -> Vec<Instant> {
        self.state.lock().unwrap().sent.iter().map(|(t, _)| *t).collect()
    }
}

pub(crate) struct MockConnector(MockController);

impl Connector for MockConnector {
    fn connect<'a>(
        &'a self,
        _host: &'a str,
        _port: u16,
    ) -> BoxFuture<'a, Result<Box<dyn MessageSocket>, Error>> {
        Box::pin(async move {
            let mut state = self.0.state.lock().unwrap();
            if state.refuse {
                return Err(Error::Closed);
            }
            state.connects += 1;
            Ok(Box::new(MockSocket {
                controller: self.0.clone(),
                pending: VecDeque::new(),
            }) as Box<dyn MessageSocket>)
        })
    }
}

struct MockSocket {
    controller: MockController,
    pending: VecDeque<Reply>,
}

impl MessageSocket for MockSocket {
    fn send_text(&mut self, text: String) -> BoxFuture<'_, Result<(), Error>> {
        Box::pin(async move {
            let request: Value = serde_json::from_str(&text).map_err(Error::JsonLoad)?;
            let reply = {
                let mut state = self.controller.state.lock().unwrap();
                state.sent.push((Instant::now(), request.clone()));
                (state.handler)(&request)
            };
            self.pending.push_back(reply);
            Ok(())
        })
    }

    fn recv_text(&mut self) -> BoxFuture<'_, Result<String, Error>> {
        Box::pin(async move {
            match self.pending.pop_front() {
                Some(Reply::Json(value)) => Ok(value.to_string()),
                Some(Reply::Raw(text)) => Ok(text),
                Some(Reply::Silent) => futures::future::pending().await,
                Some(Reply::Drop) | None => Err(Error::Closed),
            }
        })
    }

    fn close(&mut self) -> BoxFuture<'_, Result<(), Error>> {
        Box::pin(async move {
            let mut state = self.controller.state.lock().unwrap();
            state.closes += 1;
            if state.fail_close {
                Err(Error::Closed)
            } else {
                Ok(())
            }
        })
    }
}
