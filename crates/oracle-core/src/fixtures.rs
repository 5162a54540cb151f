//! Shared test data: a small market with two stocks.

use crate::Oracle;
use chrono::NaiveDate;
use oracle_account::{implementations::local::LocalWallet, AccountService};
use oracle_storage::{implementations::memory::MemoryStorage, StorageService};
use oracle_types::{Fact, Subject};
use rust_decimal::Decimal;

pub fn company_stock_1() -> Subject {
	Subject::new("GOOG")
}

pub fn company_stock_2() -> Subject {
	Subject::new("AAPL")
}

pub fn current_date() -> NaiveDate {
	NaiveDate::from_ymd_opt(2017, 7, 3).unwrap()
}

pub fn dollars(amount: i64) -> Decimal {
	Decimal::new(amount, 0)
}

pub fn volatility(num: i64, scale: u32) -> Decimal {
	Decimal::new(num, scale)
}

pub fn known_spots() -> Vec<Fact> {
	let yesterday = current_date().pred_opt().unwrap();
	vec![
		Fact::spot(company_stock_1(), current_date(), dollars(3)),
		Fact::spot(company_stock_2(), current_date(), dollars(5)),
		Fact::spot(company_stock_1(), yesterday, Decimal::new(295, 2)),
	]
}

pub fn known_volatilities() -> Vec<Fact> {
	vec![
		Fact::volatility(company_stock_1(), current_date(), volatility(4, 1)),
		Fact::volatility(company_stock_2(), current_date(), volatility(2, 1)),
	]
}

pub fn storage() -> StorageService {
	let facts = known_spots().into_iter().chain(known_volatilities());
	StorageService::new(Box::new(MemoryStorage::new(facts).unwrap()))
}

pub fn oracle() -> Oracle {
	Oracle::new(
		"Oracle",
		storage(),
		AccountService::new(Box::new(LocalWallet::random())),
	)
}
