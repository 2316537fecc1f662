//! In-memory order gateway for integration tests.
//!
//! Serves scripted case states, books and positions, assigns sequential
//! order ids starting at 1 and records every call in order.

use async_trait::async_trait;
use ritmm_core::{
    CaseState, CaseStatus, OpenOrder, OrderId, OrderRequest, OrderSide, Position, RawBook, Size,
    Ticker,
};
use ritmm_gateway::{GatewayError, GatewayResult, OrderGateway};
use rust_decimal::Decimal;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// One recorded gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetTick,
    GetBook(Ticker, usize),
    GetPosition(Ticker),
    GetOpenOrders(Ticker),
    Place(OrderRequest, OrderId),
    Cancel(OrderId),
    CancelAll(Ticker),
}

struct State {
    cases: VecDeque<CaseState>,
    last_case: CaseState,
    books: HashMap<Ticker, RawBook>,
    positions: HashMap<Ticker, i64>,
    open_orders: HashMap<Ticker, usize>,
    next_id: u64,
    places: usize,
    place_failures: HashMap<usize, GatewayError>,
    cancel_failures: VecDeque<GatewayError>,
    position_failure: Option<GatewayError>,
    calls: Vec<Call>,
}

pub struct FakeGateway {
    state: Mutex<State>,
}

impl Default for FakeGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeGateway {
    /// Active case at tick 1, no books, flat positions.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                cases: VecDeque::new(),
                last_case: CaseState {
                    tick: 1,
                    status: CaseStatus::Active,
                },
                books: HashMap::new(),
                positions: HashMap::new(),
                open_orders: HashMap::new(),
                next_id: 1,
                places: 0,
                place_failures: HashMap::new(),
                cancel_failures: VecDeque::new(),
                position_failure: None,
                calls: Vec::new(),
            }),
        }
    }

    /// Queue case states; the last one served repeats once the queue drains.
    pub fn push_case(&self, tick: u32, status: CaseStatus) {
        self.state
            .lock()
            .unwrap()
            .cases
            .push_back(CaseState { tick, status });
    }

    pub fn set_book(&self, ticker: &str, book: RawBook) {
        self.state
            .lock()
            .unwrap()
            .books
            .insert(Ticker::new(ticker), book);
    }

    pub fn set_position(&self, ticker: &str, net_quantity: i64) {
        self.state
            .lock()
            .unwrap()
            .positions
            .insert(Ticker::new(ticker), net_quantity);
    }

    pub fn set_open_orders(&self, ticker: &str, count: usize) {
        self.state
            .lock()
            .unwrap()
            .open_orders
            .insert(Ticker::new(ticker), count);
    }

    /// Fail the `n`th placement (1-based, counted across the whole run).
    pub fn fail_place(&self, n: usize, err: GatewayError) {
        self.state.lock().unwrap().place_failures.insert(n, err);
    }

    /// Fail the next cancel with `err`; queued failures apply in order.
    pub fn fail_next_cancel(&self, err: GatewayError) {
        self.state.lock().unwrap().cancel_failures.push_back(err);
    }

    pub fn fail_position(&self, err: GatewayError) {
        self.state.lock().unwrap().position_failure = Some(err);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// Placed orders as `(side, price, id)`, in placement order.
    pub fn placed(&self) -> Vec<(OrderSide, Decimal, OrderId)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Place(req, id) => Some((req.side, req.price.inner(), id)),
                _ => None,
            })
            .collect()
    }

    pub fn cancelled(&self) -> Vec<OrderId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Cancel(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn cancel_all_count(&self, ticker: &str) -> usize {
        let ticker = Ticker::new(ticker);
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::CancelAll(t) if *t == ticker))
            .count()
    }
}

#[async_trait]
impl OrderGateway for FakeGateway {
    async fn get_tick(&self) -> GatewayResult<CaseState> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::GetTick);
        if let Some(case) = state.cases.pop_front() {
            state.last_case = case;
        }
        Ok(state.last_case.clone())
    }

    async fn get_book(&self, ticker: &Ticker, depth: usize) -> GatewayResult<RawBook> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::GetBook(ticker.clone(), depth));
        Ok(state.books.get(ticker).cloned().unwrap_or_default())
    }

    async fn get_position(&self, ticker: &Ticker) -> GatewayResult<Position> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::GetPosition(ticker.clone()));
        if let Some(err) = state.position_failure.clone() {
            return Err(err);
        }
        Ok(Position {
            ticker: ticker.clone(),
            net_quantity: state.positions.get(ticker).copied().unwrap_or(0),
            average_cost: Decimal::ZERO,
        })
    }

    async fn get_open_orders(&self, ticker: &Ticker) -> GatewayResult<Vec<OpenOrder>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::GetOpenOrders(ticker.clone()));
        let count = state.open_orders.get(ticker).copied().unwrap_or(0);
        Ok((0..count)
            .map(|i| OpenOrder {
                order_id: OrderId(10_000 + i as u64),
                ticker: ticker.clone(),
                side: OrderSide::Buy,
                quantity: Size::from(100u32),
                price: None,
            })
            .collect())
    }

    async fn place_order(&self, request: &OrderRequest) -> GatewayResult<OrderId> {
        let mut state = self.state.lock().unwrap();
        state.places += 1;
        let n = state.places;
        if let Some(err) = state.place_failures.remove(&n) {
            return Err(err);
        }
        let id = OrderId(state.next_id);
        state.next_id += 1;
        state.calls.push(Call::Place(request.clone(), id));
        Ok(id)
    }

    async fn cancel_order(&self, order_id: OrderId) -> GatewayResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Cancel(order_id));
        match state.cancel_failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn cancel_all(&self, ticker: &Ticker) -> GatewayResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CancelAll(ticker.clone()));
        Ok(())
    }
}
