


use std::sync::Arc;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt; // try_collect() on the mongodb cursor
use log::info;
use mongodb::bson::{self, doc, oid::ObjectId, Document};
use mongodb::options::FindOptions;
use mongodb::{Client, Collection};
use s3req::{Engine, Storage};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use crate::constants::TRANSACTIONS_COLLECTION;
use super::{number_or_string, string_or_number};


/*
  -------------------------------------------------------------------
| one leg of a transfer attempt, either the send or the receive side
| -------------------------------------------------------------------
|
*/
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TxnRes{
    pub success: bool,
    pub message: String,
    pub tx_hash: String, // empty if the leg never got submitted
    #[serde(deserialize_with = "number_or_string")]
    pub height: i64,
    pub timestamp: Option<DateTime<Utc>>,
}

/*
  ---------------------------------------------------------------------
| what callers post, every field is optional so partially completed
| cross chain transfers can be recorded too
| ---------------------------------------------------------------------
|
*/
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TransferDetails{
    #[serde(rename = "type")]
    pub kind: String,
    pub from: String,
    pub to: String,
    #[serde(deserialize_with = "string_or_number")]
    pub amount: String,
    pub denom: String,
    pub channel1: String,
    pub channel2: String,
    pub client1: String,
    pub client2: String,
    pub connection1: String,
    pub connection2: String,
    pub from_chain: String,
    pub from_node: String,
    pub to_chain: String,
    pub to_node: String,
    pub transfer: TxnRes,
    pub receive: TxnRes,
}

/* a stored record, id is the hex of the mongodb _id */
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TransferRecord{
    pub id: String,
    #[serde(flatten)]
    pub details: TransferDetails,
}


#[derive(thiserror::Error, Debug)]
pub enum LedgerError{
    #[error("[MONGODB] - {0}")]
    MongoDb(#[from] mongodb::error::Error),
    #[error("[BSON] - failed to encode record: {0}")]
    Encode(#[from] bson::ser::Error),
    #[error("[BSON] - failed to decode record: {0}")]
    Decode(#[from] bson::de::Error),
    #[error("[BSON] - stored record has no object id")]
    MissingId,
    #[error("storage is not available")]
    Unavailable,
}


/// How `address` and `txhash` combine when both are given.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrPrecedence{
    /// Both groups must match.
    #[default]
    Conjunctive,
    /// The `txhash` group replaces the `address` group, the way the
    /// first faucet backend built its query.
    LastWins,
}


#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TransactionFilter{
    pub from: Option<String>,
    pub to: Option<String>,
    pub address: Option<String>,
    pub txhash: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Predicate{
    From(String),
    To(String),
    Address(String),  // from or to
    TxHash(String),   // send leg or receive leg
}

impl Predicate{

    pub fn matches(&self, details: &TransferDetails) -> bool{
        match self{
            Predicate::From(v) => &details.from == v,
            Predicate::To(v) => &details.to == v,
            Predicate::Address(v) => &details.from == v || &details.to == v,
            Predicate::TxHash(v) => &details.transfer.tx_hash == v || &details.receive.tx_hash == v,
        }
    }
}

impl TransactionFilter{

    pub fn predicates(&self, precedence: OrPrecedence) -> Vec<Predicate>{

        /* empty query params count as not given */
        let given = |value: &Option<String>| value.as_ref().filter(|v| !v.is_empty()).cloned();

        let mut predicates = vec![];
        if let Some(from) = given(&self.from){
            predicates.push(Predicate::From(from));
        }
        if let Some(to) = given(&self.to){
            predicates.push(Predicate::To(to));
        }

        let address = given(&self.address).map(Predicate::Address);
        let txhash = given(&self.txhash).map(Predicate::TxHash);
        match precedence{
            OrPrecedence::Conjunctive => predicates.extend(address.into_iter().chain(txhash)),
            OrPrecedence::LastWins => predicates.extend(txhash.or(address)),
        }

        predicates
    }

    pub fn matches(&self, details: &TransferDetails, precedence: OrPrecedence) -> bool{
        self.predicates(precedence).iter().all(|p| p.matches(details))
    }

    pub fn to_document(&self, precedence: OrPrecedence) -> Document{

        let mut filter = Document::new();
        let mut ors = vec![];

        for predicate in self.predicates(precedence){
            match predicate{
                Predicate::From(v) => { filter.insert("from", v); },
                Predicate::To(v) => { filter.insert("to", v); },
                Predicate::Address(v) => ors.push(vec![doc!{"from": v.clone()}, doc!{"to": v}]),
                Predicate::TxHash(v) => ors.push(vec![doc!{"transfer.txHash": v.clone()}, doc!{"receive.txHash": v}]),
            }
        }

        match ors.len(){
            0 => {},
            1 => { filter.insert("$or", ors.remove(0)); },
            _ => {
                let groups = ors.into_iter().map(|or| doc!{"$or": or}).collect::<Vec<_>>();
                filter.insert("$and", groups);
            }
        }

        filter
    }
}


/// Write once store of transfer records, there is no update or delete.
#[async_trait]
pub trait TransferLedger: Send + Sync{

    async fn insert(&self, details: TransferDetails) -> Result<String, LedgerError>;

    /// Records in insertion order, an empty vec when nothing matches.
    async fn query(&self, filter: &TransactionFilter) -> Result<Vec<TransferRecord>, LedgerError>;
}

pub fn from_storage(storage: &Storage, precedence: OrPrecedence) -> Result<Arc<dyn TransferLedger>, LedgerError>{
    match storage.engine(){
        Engine::MongoDb => {
            let client = storage.get_mongodb().ok_or(LedgerError::Unavailable)?;
            Ok(Arc::new(MongoLedger::new(client, storage.db_name(), precedence)))
        },
        Engine::Memory => Ok(Arc::new(MemoryLedger::new(precedence))),
    }
}


pub struct MongoLedger{
    collection: Collection<Document>,
    precedence: OrPrecedence,
}

impl MongoLedger{

    pub fn new(client: &Client, db_name: &str, precedence: OrPrecedence) -> Self{
        Self{
            collection: client.database(db_name).collection::<Document>(TRANSACTIONS_COLLECTION),
            precedence,
        }
    }
}

#[async_trait]
impl TransferLedger for MongoLedger{

    async fn insert(&self, details: TransferDetails) -> Result<String, LedgerError>{
        let id = ObjectId::new();
        let mut document = bson::to_document(&details)?;
        document.insert("_id", id);
        self.collection.insert_one(document, None).await?;
        info!("➔ 📒 inserted transfer record {} from {} to {}", id, details.from, details.to);
        Ok(id.to_hex())
    }

    async fn query(&self, filter: &TransactionFilter) -> Result<Vec<TransferRecord>, LedgerError>{

        let options = FindOptions::builder().sort(doc!{"_id": 1}).build(); // object ids grow with insertion time
        let cursor = self.collection.find(filter.to_document(self.precedence), options).await?;
        let documents = cursor.try_collect::<Vec<Document>>().await?;

        documents
            .into_iter()
            .map(|mut document| {
                let id = document.get_object_id("_id").map_err(|_| LedgerError::MissingId)?;
                document.remove("_id");
                Ok(
                    TransferRecord{
                        id: id.to_hex(),
                        details: bson::from_document::<TransferDetails>(document)?,
                    }
                )
            })
            .collect()
    }
}


/* used when DB_ENGINE=memory, nothing survives a restart */
#[derive(Default)]
pub struct MemoryLedger{
    records: RwLock<Vec<TransferRecord>>,
    precedence: OrPrecedence,
}

impl MemoryLedger{

    pub fn new(precedence: OrPrecedence) -> Self{
        Self{
            records: RwLock::new(vec![]),
            precedence,
        }
    }
}

#[async_trait]
impl TransferLedger for MemoryLedger{

    async fn insert(&self, details: TransferDetails) -> Result<String, LedgerError>{
        let id = ObjectId::new().to_hex();
        self.records.write().await.push(
            TransferRecord{
                id: id.clone(),
                details,
            }
        );
        Ok(id)
    }

    async fn query(&self, filter: &TransactionFilter) -> Result<Vec<TransferRecord>, LedgerError>{
        let records = self.records.read().await;
        Ok(
            records
                .iter()
                .filter(|record| filter.matches(&record.details, self.precedence))
                .cloned()
                .collect()
        )
    }
}
