//! Record schemas for the three generated tables and their
//! categorical domains.
//!
//! Field order on the record structs is the persisted CSV column
//! order; serde renames carry the exact display labels used in the
//! dashboard, so the CSV form matches what the charts show.

use crate::types::{CustomerId, TransactionId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Customer tier, correlated with income and transaction activity
/// (Premium > Gold > Silver > Bronze).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    Premium,
    Gold,
    Silver,
    Bronze,
}

impl Segment {
    pub const ALL: [Segment; 4] = [Self::Premium, Self::Gold, Self::Silver, Self::Bronze];

    /// Population share used by the generator's categorical draw.
    pub fn weight(&self) -> f64 {
        match self {
            Self::Premium => 0.10,
            Self::Gold => 0.20,
            Self::Silver => 0.40,
            Self::Bronze => 0.30,
        }
    }

    /// Multiplicative income adjustment applied after the log-normal
    /// draw, before clamping. Keeps Premium ≥ Gold ≥ Silver ≥ Bronze.
    pub fn income_multiplier(&self) -> f64 {
        match self {
            Self::Premium => 3.0,
            Self::Gold => 2.0,
            Self::Silver => 1.2,
            Self::Bronze => 1.0,
        }
    }

    /// Scale factor on the per-customer Poisson transaction count.
    pub fn txn_multiplier(&self) -> f64 {
        match self {
            Self::Premium => 3.0,
            Self::Gold => 2.0,
            Self::Silver => 1.5,
            Self::Bronze => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Premium => "Premium",
            Self::Gold => "Gold",
            Self::Silver => "Silver",
            Self::Bronze => "Bronze",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The eight transaction categories of the Brazilian retail rails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    #[serde(rename = "PIX")]
    Pix,
    #[serde(rename = "TED")]
    Ted,
    #[serde(rename = "DOC")]
    Doc,
    #[serde(rename = "Débito Automático")]
    DebitoAutomatico,
    #[serde(rename = "Cartão Débito")]
    CartaoDebito,
    #[serde(rename = "Cartão Crédito")]
    CartaoCredito,
    #[serde(rename = "Saque")]
    Saque,
    #[serde(rename = "Depósito")]
    Deposito,
}

impl TransactionType {
    pub const ALL: [TransactionType; 8] = [
        Self::Pix,
        Self::Ted,
        Self::Doc,
        Self::DebitoAutomatico,
        Self::CartaoDebito,
        Self::CartaoCredito,
        Self::Saque,
        Self::Deposito,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pix => "PIX",
            Self::Ted => "TED",
            Self::Doc => "DOC",
            Self::DebitoAutomatico => "Débito Automático",
            Self::CartaoDebito => "Cartão Débito",
            Self::CartaoCredito => "Cartão Crédito",
            Self::Saque => "Saque",
            Self::Deposito => "Depósito",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The eight product catalog entries a customer can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    #[serde(rename = "Conta Corrente")]
    ContaCorrente,
    #[serde(rename = "Poupança")]
    Poupanca,
    #[serde(rename = "Cartão de Crédito")]
    CartaoDeCredito,
    #[serde(rename = "Empréstimo Pessoal")]
    EmprestimoPessoal,
    #[serde(rename = "Financiamento Imobiliário")]
    FinanciamentoImobiliario,
    #[serde(rename = "Investimentos")]
    Investimentos,
    #[serde(rename = "Seguros")]
    Seguros,
    #[serde(rename = "Previdência")]
    Previdencia,
}

impl ProductType {
    pub const ALL: [ProductType; 8] = [
        Self::ContaCorrente,
        Self::Poupanca,
        Self::CartaoDeCredito,
        Self::EmprestimoPessoal,
        Self::FinanciamentoImobiliario,
        Self::Investimentos,
        Self::Seguros,
        Self::Previdencia,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContaCorrente => "Conta Corrente",
            Self::Poupanca => "Poupança",
            Self::CartaoDeCredito => "Cartão de Crédito",
            Self::EmprestimoPessoal => "Empréstimo Pessoal",
            Self::FinanciamentoImobiliario => "Financiamento Imobiliário",
            Self::Investimentos => "Investimentos",
            Self::Seguros => "Seguros",
            Self::Previdencia => "Previdência",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery medium of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Mobile,
    Internet,
    #[serde(rename = "ATM")]
    Atm,
    Branch,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Self::Mobile, Self::Internet, Self::Atm, Self::Branch];

    /// Share of transactions arriving through this channel.
    pub fn weight(&self) -> f64 {
        match self {
            Self::Mobile => 0.50,
            Self::Internet => 0.30,
            Self::Atm => 0.15,
            Self::Branch => 0.05,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mobile => "Mobile",
            Self::Internet => "Internet",
            Self::Atm => "ATM",
            Self::Branch => "Branch",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub customer_id: CustomerId,
    pub age: f64,
    pub income: f64,
    pub segment: Segment,
    pub city: String,
    pub account_opening_date: NaiveDate,
    pub is_active: bool,
    pub credit_score: f64,
    pub num_products: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_id: TransactionId,
    pub customer_id: CustomerId,
    pub transaction_date: NaiveDate,
    pub transaction_type: TransactionType,
    pub amount: f64,
    pub is_fraud: bool,
    pub channel: Channel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductHoldingRecord {
    pub customer_id: CustomerId,
    pub product_type: ProductType,
    pub balance: f64,
    pub opening_date: NaiveDate,
    pub is_active: bool,
}
