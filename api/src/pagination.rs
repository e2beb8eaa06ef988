use std::future::Future;

/// Requests pages `1, 2, ...` one after another and concatenates them until a page comes back empty. The first
/// failing page aborts the walk; records of earlier pages are dropped.
pub async fn fetch_all_pages<T, E, F, Fut>(mut fetch_page: F) -> Result<Vec<T>, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    let mut records = Vec::new();
    for page_number in 1u32.. {
        let page = fetch_page(page_number).await?;
        if page.is_empty() {
            trace!(page_number, total = records.len(), "Reached empty page");
            break;
        }
        trace!(page_number, len = page.len(), "Fetched page");
        records.extend(page);
    }
    Ok(records)
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn stops_at_the_first_empty_page() {
        let mut requested = Vec::new();
        let records = fetch_all_pages(|page| {
            requested.push(page);
            let result: Result<Vec<u32>, ()> = match page {
                1 | 2 => Ok((0..1000).map(|i| page * 10_000 + i).collect()),
                _ => Ok(Vec::new()),
            };
            async move { result }
        })
        .await
        .unwrap();

        assert_eq!(requested, vec![1, 2, 3]);
        assert_eq!(records.len(), 2000);
        assert_eq!(records[0], 10_000);
        assert_eq!(records[1999], 20_999);
    }

    #[tokio::test]
    async fn empty_first_page_yields_nothing() {
        let mut calls = 0;
        let records = fetch_all_pages(|_| {
            calls += 1;
            async { Ok::<Vec<u8>, ()>(Vec::new()) }
        })
        .await
        .unwrap();
        assert!(records.is_empty());
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn error_discards_earlier_pages() {
        let mut requested = Vec::new();
        let result = fetch_all_pages(|page| {
            requested.push(page);
            let result = match page {
                1 => Ok(vec!["a", "b"]),
                2 => Err("boom"),
                _ => Ok(Vec::new()),
            };
            async move { result }
        })
        .await;

        assert_eq!(result, Err("boom"));
        assert_eq!(requested, vec![1, 2]);
    }
}
