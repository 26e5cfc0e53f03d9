//! Local transaction list state.
//!
//! [`TransactionLedger`] mirrors what the user is looking at: the loaded
//! transactions, the one opened for editing and the last error. Each
//! operation calls the transaction service and then applies the result to the
//! local list, so no refetch is needed after create, update or delete.

use crate::{
    client::ApiClient,
    error::{ApiError, Operation, OperationError},
    models::{CreateTransactionRequest, PaginationParams, Transaction, UpdateTransactionRequest},
    services::transaction_service,
};

#[derive(Debug)]
pub struct TransactionLedger {
    client: ApiClient,
    transactions: Vec<Transaction>,
    current: Option<Transaction>,
    error: Option<String>,
}

impl TransactionLedger {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            transactions: Vec::new(),
            current: None,
            error: None,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Transaction loaded by [`fetch_transaction`](Self::fetch_transaction).
    pub fn current(&self) -> Option<&Transaction> {
        self.current.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replace the local list with the first page from the server.
    pub async fn fetch_transactions(&mut self) -> Result<&[Transaction], OperationError> {
        self.error = None;

        let result = transaction_service::list(&self.client, &PaginationParams::default()).await;
        let page = result.map_err(|e| self.fail(Operation::FetchTransactions, e))?;

        self.transactions = page.data;
        Ok(self.transactions.as_slice())
    }

    pub async fn fetch_transaction(&mut self, id: &str) -> Result<&Transaction, OperationError> {
        self.error = None;

        let result = transaction_service::get(&self.client, id).await;
        let transaction = result.map_err(|e| self.fail(Operation::FetchTransaction, e))?;

        Ok(&*self.current.insert(transaction))
    }

    /// Create a transaction and put it at the top of the list.
    pub async fn create_transaction(
        &mut self,
        request: &CreateTransactionRequest,
    ) -> Result<Transaction, OperationError> {
        self.error = None;

        let result = transaction_service::create(&self.client, request).await;
        let transaction = result.map_err(|e| self.fail(Operation::CreateTransaction, e))?;

        self.transactions.insert(0, transaction.clone());
        Ok(transaction)
    }

    /// Patch a transaction and replace the local copy, if it is loaded.
    pub async fn update_transaction(
        &mut self,
        id: &str,
        request: &UpdateTransactionRequest,
    ) -> Result<Transaction, OperationError> {
        self.error = None;

        let result = transaction_service::update(&self.client, id, request).await;
        let updated = result.map_err(|e| self.fail(Operation::UpdateTransaction, e))?;

        if let Some(slot) = self.transactions.iter_mut().find(|t| t.id == id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    pub async fn delete_transaction(&mut self, id: &str) -> Result<(), OperationError> {
        self.error = None;

        let result = transaction_service::delete(&self.client, id).await;
        result.map_err(|e| self.fail(Operation::DeleteTransaction, e))?;

        self.transactions.retain(|t| t.id != id);
        Ok(())
    }

    fn fail(&mut self, operation: Operation, source: ApiError) -> OperationError {
        let error = OperationError::new(operation, source);
        self.error = Some(error.message.clone());
        error
    }
}
