// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Browser upload form served at `/`

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
    <head>
        <title>Lab Report OCR API</title>
        <style>
            body { font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; }
            h1 { color: #333; }
            form { margin-top: 20px; padding: 20px; border: 1px solid #ddd; border-radius: 5px; }
            button { background-color: #4CAF50; color: white; padding: 10px 15px; border: none; border-radius: 4px; cursor: pointer; }
            button:hover { background-color: #45a049; }
            #result { margin-top: 20px; padding: 10px; border: 1px solid #ddd; border-radius: 5px; white-space: pre-wrap; }
            .loading { display: none; margin-left: 10px; }
        </style>
    </head>
    <body>
        <h1>Lab Report OCR API</h1>
        <p>Upload a lab report image to extract test results. The API endpoint only accepts POST requests.</p>

        <form id="upload-form" enctype="multipart/form-data">
            <input type="file" id="file-input" name="file" accept="image/*" required>
            <button type="submit">Process Image</button>
            <span class="loading" id="loading">Processing...</span>
        </form>

        <div id="result"></div>

        <script>
            document.getElementById('upload-form').addEventListener('submit', async (e) => {
                e.preventDefault();

                const formData = new FormData();
                formData.append('file', document.getElementById('file-input').files[0]);

                const loading = document.getElementById('loading');
                const result = document.getElementById('result');
                loading.style.display = 'inline';
                result.textContent = '';

                try {
                    const response = await fetch('/get-lab-tests', { method: 'POST', body: formData });
                    const data = await response.json();
                    result.textContent = JSON.stringify(data, null, 2);
                } catch (error) {
                    result.textContent = `Error: ${error.message}`;
                } finally {
                    loading.style.display = 'none';
                }
            });
        </script>
    </body>
</html>
"#;
